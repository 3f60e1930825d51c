// Integration tests for the HTTP catalog client

mod common;

use std::net::TcpListener;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use common::{Canned, png_bytes, serve, serve_with};
use media_savant_scanner::catalog::{Catalog, LookupOutcome, OmdbClient};
use media_savant_scanner::config::{ConfigBuilder, ScanConfig};
use media_savant_scanner::library;
use media_savant_scanner::thumbnail::PosterSource;
use media_savant_scanner::title::TitleGuess;

fn config(api_url: &str, root: &std::path::Path, output: &std::path::Path) -> ScanConfig {
    ConfigBuilder::new()
        .library_root(root)
        .output_path(output)
        .api_key("secret")
        .api_url(api_url)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn client(api_url: &str) -> OmdbClient {
    let dir = std::env::temp_dir();
    OmdbClient::new(&config(api_url, &dir, &dir.join("unused.json"))).unwrap()
}

#[test]
fn test_lookup_found_sends_expected_query() {
    let body = r#"{"Title":"Bruiser","Year":"2022","Genre":"Drama","Plot":"A teenager meets a drifter.","Poster":"N/A","Response":"True"}"#;
    let (base, handle) = serve(vec![Canned::json(200, body)]);

    let outcome = client(&format!("{}/", base)).lookup(&TitleGuess::new("Bruiser ", Some("2022")));
    match outcome {
        LookupOutcome::Found(entry) => {
            assert_eq!(entry.title, "Bruiser");
            assert_eq!(entry.genre, "Drama");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let requests = handle.join().unwrap();
    assert_eq!(requests.len(), 1);
    let line = &requests[0];
    assert!(line.starts_with("GET /?"));
    assert!(line.contains("t=Bruiser+"));
    assert!(line.contains("y=2022"));
    assert!(line.contains("plot=full"));
    assert!(line.contains("apikey=secret"));
    assert!(line.contains("type=movie"));
}

#[test]
fn test_lookup_not_found() {
    let (base, handle) = serve(vec![Canned::json(200, r#"{"Response":"False","Error":"Movie not found!"}"#)]);
    let outcome = client(&base).lookup(&TitleGuess::new("Nothing Like This", None));
    assert_eq!(outcome, LookupOutcome::NotFound);
    let requests = handle.join().unwrap();
    let line = &requests[0];
    assert!(line.contains("t=Nothing+Like+This"));
    assert!(!line.contains("?y=") && !line.contains("&y="));
}

#[test]
fn test_lookup_server_error() {
    let (base, handle) = serve(vec![Canned::json(503, "{}")]);
    let outcome = client(&base).lookup(&TitleGuess::new("Heat", Some("1995")));
    assert!(matches!(outcome, LookupOutcome::Unavailable(_)));
    handle.join().unwrap();
}

#[test]
fn test_lookup_unreachable_host() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let outcome = client(&format!("http://127.0.0.1:{}/", port)).lookup(&TitleGuess::new("Heat", None));
    assert!(matches!(outcome, LookupOutcome::Unavailable(_)));
}

#[test]
fn test_fetch_poster() {
    let png = png_bytes(4, 6);
    let (base, handle) = serve(vec![Canned::png(png.clone()), Canned::json(404, "")]);
    let client = client(&base);

    let bytes = client.fetch_poster(&format!("{}/poster.png", base)).unwrap();
    assert_eq!(bytes, png);
    assert!(client.fetch_poster(&format!("{}/missing.png", base)).is_err());

    let requests = handle.join().unwrap();
    assert!(requests[0].starts_with("GET /poster.png"));
}

#[test]
fn test_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Movies");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("Bruiser.2022.LIGHTDLMOVIES.mkv"), b"").unwrap();
    let output = dir.path().join("metadata.json");

    let (base, handle) = serve_with(|base| {
        let catalog = format!(
            r#"{{"Title":"Bruiser","Year":"2022","Genre":"Drama","Plot":"...","Poster":"{}/poster.png","Response":"True"}}"#,
            base
        );
        vec![Canned::json(200, &catalog), Canned::png(png_bytes(400, 600))]
    });

    let config = config(&base, &root, &output);
    let client = OmdbClient::new(&config).unwrap();
    let summary = library::run(&config, &client, &client).unwrap();
    assert_eq!(summary.records_added, 1);
    assert_eq!(summary.writes, 2);

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let record = &doc[0];
    assert_eq!(record["title"], "Bruiser");
    assert_eq!(record["filename"], "Bruiser.2022.LIGHTDLMOVIES.mkv");
    assert_eq!(record["poster"], format!("{}/poster.png", base));

    // 400x600 shrinks to at most 200x200, three bytes per RGB pixel
    let thumbnail = record["thumbnail"].as_str().unwrap();
    let raw = STANDARD.decode(thumbnail).unwrap();
    assert!(raw.len() <= 200 * 200 * 3);
    assert_eq!(raw.len() % 3, 0);

    let requests = handle.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].contains("t=Bruiser+"));
    assert!(requests[1].starts_with("GET /poster.png"));
}
