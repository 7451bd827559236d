use utoipa::OpenApi;

fn main() {
    let doc = relay_api::routes::ApiDoc::openapi()
        .to_pretty_json()
        .expect("serialize OpenAPI document");
    let out = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../specs/relay-api.json");
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).expect("create output directory");
    }
    std::fs::write(&out, doc).expect("write OpenAPI document");
    println!("Wrote {}", out.display());
}
