#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_form_data::form_tree::field_path;
use shiguredo_form_data::{FieldValue, FormTable};

fuzz_target!(|names: Vec<&str>| {
    let mut table = FormTable::new();
    for name in &names {
        assert!(!field_path(name).is_empty());
        table.insert(name, FieldValue::from(*name));
    }

    let _ = table.is_list();
    assert!(table.leaves().len() <= names.len());
    let _ = nojson::Json(&table).to_string();
});
