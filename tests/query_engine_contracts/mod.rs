//! Query engine contract tests: inference, navigation and translation.

mod inference_contract;
mod navigation_contract;

use std::sync::Arc;

use rex_query::{Catalog, Domain};

/// Catalog shared by the contract tests.
pub const CATALOG: &str = r#"{
    "entity": [
        {
            "name": "study",
            "label": "Study",
            "field": [
                {"label": "code", "title": "Code", "column": {"type": "text"}},
                {"label": "title", "title": "Title", "column": {"type": "text"}, "partial": true},
                {"label": "status", "title": "Status",
                 "column": {"type": "enum", "enum": ["active", "completed"]}},
                {"label": "start_date", "title": "Start Date", "column": {"type": "date"}},
                {"label": "enrolled", "title": "Enrolled", "column": {"type": "integer"}},
                {"label": "name", "title": "Name", "column": {"type": "text"}},
                {"label": "site", "title": "Sites", "plural": true,
                 "link": {"target": "site", "inverse": "study"}},
                {"label": "lead", "title": "Lead", "partial": true,
                 "link": {"target": "individual"}}
            ]
        },
        {
            "name": "site",
            "label": "Site",
            "field": [
                {"label": "name", "title": "Name", "column": {"type": "text"}},
                {"label": "size", "title": "Size", "column": {"type": "integer"}},
                {"label": "study", "title": "Study", "link": {"target": "study"}}
            ]
        },
        {
            "name": "individual",
            "label": "Individual",
            "field": [
                {"label": "code", "title": "Code", "column": {"type": "text"}},
                {"label": "sex", "title": "Sex",
                 "column": {"type": "enum", "enum": ["male", "female"]}},
                {"label": "birth", "title": "Birth Date", "column": {"type": "date"}},
                {"label": "site", "title": "Site", "link": {"target": "site"}}
            ]
        },
        {
            "name": "customer",
            "label": "Customer",
            "field": [
                {"label": "name", "title": "Name", "column": {"type": "text"}}
            ]
        }
    ]
}"#;

/// Builds the domain used by the contract tests.
pub fn create_test_domain() -> Arc<Domain> {
    let catalog = Catalog::from_json(CATALOG).expect("parse catalog");
    Arc::new(catalog.to_domain().expect("build domain"))
}
