use sqlite_inspect::sqlite::core::varint::encode_varint;
use std::io::Write;
use tempfile::NamedTempFile;

pub enum Col<'a> {
    Text(&'a str),
    Int(u8),
}

/// sqlite_master row: (type, name, tbl_name, rootpage, sql)
pub fn schema_row<'a>(object_type: &'a str, name: &'a str, root: u8, sql: &'a str) -> Vec<Col<'a>> {
    vec![
        Col::Text(object_type),
        Col::Text(name),
        Col::Text(name),
        Col::Int(root),
        Col::Text(sql),
    ]
}

/// A database image of `num_pages` pages whose first page holds `rows`
pub fn build_db(page_size: u16, num_pages: usize, rows: &[Vec<Col>]) -> Vec<u8> {
    let mut image = vec![0u8; page_size as usize * num_pages];
    let page = &mut image[..page_size as usize];
    page[..16].copy_from_slice(b"SQLite format 3\0");
    page[16..18].copy_from_slice(&page_size.to_be_bytes());
    page[18] = 1;
    page[19] = 1;
    page[28..32].copy_from_slice(&(num_pages as u32).to_be_bytes());
    page[56..60].copy_from_slice(&1u32.to_be_bytes());
    page[100] = 0x0d;
    page[103..105].copy_from_slice(&(rows.len() as u16).to_be_bytes());

    let mut content_start = page.len();
    for (i, row) in rows.iter().enumerate() {
        let mut types = Vec::new();
        let mut values = Vec::new();
        for col in row {
            match col {
                Col::Text(s) => {
                    types.extend(encode_varint(13 + 2 * s.len() as u64));
                    values.extend_from_slice(s.as_bytes());
                }
                Col::Int(n) => {
                    types.push(1);
                    values.push(*n);
                }
            }
        }
        let mut body = encode_varint(1 + types.len() as u64);
        body.extend(types);
        body.extend(values);

        let mut cell = encode_varint(body.len() as u64);
        cell.extend(encode_varint(i as u64 + 1));
        cell.extend(body);

        content_start -= cell.len();
        page[content_start..content_start + cell.len()].copy_from_slice(&cell);
        let ptr_at = 108 + i * 2;
        page[ptr_at..ptr_at + 2].copy_from_slice(&(content_start as u16).to_be_bytes());
    }
    page[105..107].copy_from_slice(&(content_start as u16).to_be_bytes());
    image
}

pub fn write_db(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
