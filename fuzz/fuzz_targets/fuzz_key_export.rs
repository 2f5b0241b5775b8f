#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(serde_json::Value::Object(tree)) = serde_json::from_slice(data) {
        let _ = jsonfold::artifact::render_key_export(&tree, "i18nKeys", true);
        let _ = jsonfold::artifact::render_key_export(&tree, "i18nKeys", false);
        if let Ok(json) = jsonfold::artifact::render_json(&tree) {
            let _ = jsonfold::artifact::render_ts_interface(&json, "Messages");
        }
    }
});
