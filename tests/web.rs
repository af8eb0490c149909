//! Browser tests for the canvas binding; run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use fractal_tree::FractalTree;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container(width: u32, height: u32) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    div.set_attribute("style", &format!("width:{width}px;height:{height}px"))
        .unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn test_attaches_canvas_and_starts_growing() {
    let div = container(300, 400);
    let tree = FractalTree::new(Some(div.clone()), Some("seed: 42".into())).unwrap();

    assert_eq!(div.get_elements_by_tag_name("canvas").length(), 1);
    assert_eq!(tree.branch_count(), 2047);
    assert_eq!(tree.current_depth(), 0);
    assert!(tree.is_growing());
    assert!(tree.tree_top().unwrap() < 400.0);
}

#[wasm_bindgen_test]
fn test_complete_and_destroy() {
    let div = container(200, 200);
    let options = r#"{"visibleDepth": 4}"#.to_string();
    let mut tree = FractalTree::new(Some(div.clone()), Some(options)).unwrap();

    tree.complete();
    assert!(!tree.is_growing());
    assert_eq!(tree.current_depth(), 4);

    tree.destroy();
    assert_eq!(div.get_elements_by_tag_name("canvas").length(), 0);
}

#[wasm_bindgen_test]
fn test_invalid_options_rejected() {
    let div = container(100, 100);
    assert!(FractalTree::new(Some(div), Some("growthSpeed: -3".into())).is_err());
}
