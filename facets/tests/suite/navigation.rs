use super::Harness;
use super::response;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn active_filters_carry_labels_and_links() {
    let model = Harness::new().assemble("path=turkey/domuztepe&type=subjects&rows=10", &response(0, &[]));
    assert_eq!(model.active_filters.len(), 2);

    let path = &model.active_filters[0];
    assert_eq!(path.parameter, "path");
    assert_eq!(path.label, "Turkey :: Domuztepe");
    assert_eq!(path.removal_link, "/query/?type=subjects&rows=10");
    assert_eq!(
        path.broaden_link.as_deref(),
        Some("/query/?path=turkey&type=subjects&rows=10")
    );

    let item_type = &model.active_filters[1];
    assert_eq!(item_type.label, "subjects");
    assert_eq!(item_type.broaden_link, None);
}

#[test]
fn alternatives_are_labelled_with_or() {
    let model = Harness::new().assemble("prop=material---shell||stone", &response(0, &[]));
    assert_eq!(model.active_filters[0].label, "Material :: Shell OR Stone");
    assert_eq!(
        model.active_filters[0].broaden_link.as_deref(),
        Some("/query/?prop=material")
    );
}

#[test]
fn paging_follows_the_compiled_window() {
    let model = Harness::new().assemble("path=italy&rows=10&start=10", &response(35, &[]));
    assert_eq!(model.total, 35);
    assert_eq!(
        model.paging.previous.as_deref(),
        Some("/query/?path=italy&rows=10&start=0")
    );
    assert_eq!(
        model.paging.next.as_deref(),
        Some("/query/?path=italy&rows=10&start=20")
    );
    assert_eq!(
        model.paging.last.as_deref(),
        Some("/query/?path=italy&rows=10&start=30")
    );
}

#[test]
fn sort_descriptor_reflects_the_request() {
    let model = Harness::new().assemble("sort=item--asc", &response(1, &[]));
    assert_eq!(model.sort.active.len(), 1);
    assert_eq!(model.sort.active[0].key, "item");
    assert!(model.sort.options.iter().all(|option| option.link.is_some()));
}

#[test]
fn misses_and_rejections_are_reported() {
    let model = Harness::new().assemble(
        "prop=material---bone&disc-geotile=9",
        &response(0, &[]),
    );
    assert_eq!(model.unresolved, vec!["bone"]);
    assert_eq!(model.rejected_filters.len(), 1);
    assert_eq!(model.rejected_filters[0].parameter, "disc-geotile");
}

#[test]
fn model_serializes_without_absent_links() {
    let model = Harness::new().assemble("", &response(0, &[]));
    let value = serde_json::to_value(&model).expect("serialize");
    assert_eq!(value["id"], json!("/query/"));
    assert_eq!(value["paging"], json!({}));
    assert!(value.get("chrono_tiles").is_none());
}
