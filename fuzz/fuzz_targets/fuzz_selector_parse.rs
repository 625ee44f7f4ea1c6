#![no_main]

use falsework_dom::{Document, SelectorList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(list) = SelectorList::parse(source) else {
        return;
    };
    assert_eq!(list.subject_tags().len(), list.selectors().len());

    let doc = Document::new();
    let outer = doc.create_element("div");
    outer.set_attribute("class", "a b");
    let inner = doc.create_element("button");
    inner.set_attribute("id", "x");
    let _ = outer.append_child(&inner);
    let _ = doc.root().append_child(&outer);
    let _ = inner.matches_list(&list);
    let _ = inner.closest(&list);
    let _ = doc.root().query_selector_all(&list);
});
