//! Full runs against stub services, checked through the written artifact.

use super::support::{harness, test_config, EchoFetcher, ScriptedText, TITLE};
use pagesmith::template::LAYOUT_BLOCKS;
use pagesmith::usage::UsageLedger;
use serde_json::Value;

fn read_artifact(path: &std::path::Path) -> Value {
    let bytes = std::fs::read(path).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_generates_full_layout_for_acme_coffee() {
    let config = test_config();
    let h = harness(&config, ScriptedText::happy(), EchoFetcher::default());

    let report = h.generator.generate("Acme", "coffee").await.unwrap();

    assert_eq!(report.attempts, 1);
    assert_eq!(report.request.keyword, "espresso beans online");
    assert_eq!(
        report.artifact,
        h.workspace.path().join("content").join("data.json")
    );

    let doc = read_artifact(&report.artifact);
    let layouts = doc["layouts"].as_array().unwrap();
    assert_eq!(layouts.len(), LAYOUT_BLOCKS);
    for (i, block) in layouts.iter().enumerate() {
        assert_eq!(block["value"]["position"], i as u64);
    }

    // Logo is rendered first, so it is the first image call.
    assert_eq!(layouts[0]["layout"], "Layout_header_1");
    assert_eq!(layouts[0]["value"]["image"], "b64:https://images.test/1");
    assert_eq!(
        layouts[6]["value"]["images"].as_array().unwrap().len(),
        config.pipeline.gallery_size
    );
    assert_eq!(doc["meta_data"]["title"], TITLE);
    assert_eq!(doc["meta_data"]["description"], "Fresh small batch coffee from Acme.");

    assert_eq!(layouts[1]["value"]["h1"], "Coffee worth waking up for");
    assert_eq!(layouts[3]["value"]["blogs"].as_array().unwrap().len(), 3);
    assert_eq!(layouts[5]["value"]["Faq"][0]["h3"], "Do you ship?");
    assert_eq!(layouts[7]["value"]["h2"], "Our Mission");
    assert!(layouts[8]["value"]["map_src"]
        .as_str()
        .unwrap()
        .starts_with("https://maps.google.com"));
    assert_eq!(
        layouts[9]["value"]["paragraph"].as_array().unwrap().len(),
        3
    );
    // logo, four sections, full gallery
    assert_eq!(h.images.calls(), 1 + 4 + config.pipeline.gallery_size);
}

#[tokio::test]
async fn test_usage_ledger_brackets_the_run() {
    let config = test_config();
    let h = harness(&config, ScriptedText::happy(), EchoFetcher::default());

    h.generator.generate("Acme", "coffee").await.unwrap();

    let rows = UsageLedger::read_rows(&h.generator.workspace().usage_log_path()).unwrap();
    assert_eq!(rows.first().unwrap().stage, "Initial");
    assert_eq!(rows.first().unwrap().iteration, 0);
    assert_eq!(rows.last().unwrap().stage, "Complete");
    assert!(rows.iter().all(|r| r.company == "Acme" && r.keyword == "coffee"));
    // every text call plus the two markers
    assert_eq!(rows.len(), h.text.calls() + 2);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.iteration, i as u64);
    }
}

#[tokio::test]
async fn test_failed_gallery_downloads_are_left_out() {
    let mut config = test_config();
    config.pipeline.gallery_size = 5;
    // calls 1-5 are the logo and sections; 6 and 7 are the first gallery images
    let fetcher = EchoFetcher::missing(&["https://images.test/6", "https://images.test/7"]);
    let h = harness(&config, ScriptedText::happy(), fetcher);

    let report = h.generator.generate("Acme", "coffee").await.unwrap();

    let doc = read_artifact(&report.artifact);
    let gallery = doc["layouts"][6]["value"]["images"].as_array().unwrap();
    assert_eq!(gallery.len(), 3);
    assert!(gallery
        .iter()
        .all(|img| img["url"] != "b64:https://images.test/6"));
}

#[tokio::test]
async fn test_failed_logo_leaves_header_and_footer_images_empty() {
    let config = test_config();
    // the logo download fails; the run still succeeds
    let fetcher = EchoFetcher::missing(&["https://images.test/1"]);
    let h = harness(&config, ScriptedText::happy(), fetcher);

    let report = h.generator.generate("Acme", "coffee").await.unwrap();

    let doc = read_artifact(&report.artifact);
    assert_eq!(doc["layouts"][0]["value"]["image"], "");
    assert_eq!(doc["layouts"][9]["value"]["image"], "");
}
