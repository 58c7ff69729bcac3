#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return,
    };
    let table = match csv_table::parse(text) {
        Ok(table) => table,
        Err(_) => return,
    };
    let _ = csv_table::parse_typed(text);
    let written = csv_table::stringify(&table).unwrap();
    assert_eq!(csv_table::parse(&written).unwrap(), table);
});
