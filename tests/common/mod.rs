//! Scripted transport shared by the network-free tests.
#![allow(dead_code)]

use anyhow::anyhow;
use kolada_rs::{Client, HttpResponse, Transport};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

pub const BASE: &str = "http://kolada.test/v2";

/// Answers GETs from a fixed url -> response table and records every call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, HttpResponse>,
    calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn json(self, url: &str, body: Value) -> Self {
        self.route(url, 200, &body.to_string())
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> anyhow::Result<HttpResponse> {
        self.calls.borrow_mut().push((
            url.to_string(),
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {}", url))
    }
}

pub fn client(transport: ScriptedTransport) -> Client<ScriptedTransport> {
    Client::with_transport(transport).base_url(BASE)
}

pub fn data_url(municipality: &str, year: i32) -> String {
    format!("{}/data/municipality/{}/year/{}", BASE, municipality, year)
}

pub fn kpi_url(kpi: &str) -> String {
    format!("{}/kpi/{}", BASE, kpi)
}

/// One data record with a single total value.
pub fn record(kpi: &str, value: Value) -> Value {
    json!({
        "kpi": kpi,
        "municipality": "1860",
        "period": 2010,
        "values": [{"count": 1, "gender": "T", "status": "", "value": value}]
    })
}

pub fn page(records: Vec<Value>, next_page: Option<&str>) -> Value {
    let mut body = json!({"count": records.len(), "values": records});
    if let Some(next) = next_page {
        body["next_page"] = json!(next);
    }
    body
}

pub fn kpi_meta(kpi: &str, title: &str) -> Value {
    json!({
        "count": 1,
        "values": [{
            "id": kpi,
            "title": title,
            "description": format!("Description of {}", kpi),
            "operating_area": "Test",
            "has_ou_data": false
        }]
    })
}
