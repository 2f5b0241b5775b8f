#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split the input into two documents and merge whatever parses
    let mid = data.len() / 2;
    let (first, second) = data.split_at(mid);

    let mut tree = jsonfold::Tree::new();
    for part in [first, second] {
        if let Ok(serde_json::Value::Object(doc)) = serde_json::from_slice(part) {
            jsonfold::deep_merge(&mut tree, doc);
        }
    }

    let _ = jsonfold::artifact::render_json(&tree);
});
