// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json
//
// Generates the spec without starting the server, for CI and documentation builds.

use teamcal_server::openapi::ApiDoc;

fn main() {
    println!("{}", ApiDoc::to_json());
}
