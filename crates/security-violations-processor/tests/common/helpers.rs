// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batch builders and decoders for integration tests

#![allow(dead_code)]

use std::io::Read;

use security_violations_processor::model::{InstrumentationScope, SeverityNumber};
use security_violations_processor::{AnyValue, KeyValue, Logs};

/// Decode a gzip stream, panicking on a malformed or truncated one
pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .expect("Failed to decode gzip body");
    out
}

/// Decode a xerial-framed snappy stream
pub fn unxerial(data: &[u8]) -> Vec<u8> {
    assert!(data.len() >= 16, "xerial header truncated");
    assert_eq!(&data[..8], &security_violations_processor::xerial::MAGIC);

    let mut decoder = snap::raw::Decoder::new();
    let mut out = Vec::new();
    let mut rest = &data[16..];
    while !rest.is_empty() {
        let len = u32::from_be_bytes(rest[..4].try_into().expect("block length")) as usize;
        let block = &rest[4..4 + len];
        out.extend(
            decoder
                .decompress_vec(block)
                .expect("Failed to decode snappy block"),
        );
        rest = &rest[4 + len..];
    }
    out
}

/// A record-level attribute set shared by every record the builders create
pub fn record_attributes(index: usize) -> Vec<KeyValue> {
    vec![
        KeyValue::new("violation.id", format!("v-{index}")),
        KeyValue::new("violation.rating", 4i64),
        KeyValue::new("blocked", true),
    ]
}

/// Build `resources` x `scopes` x `records` records with the given bodies,
/// reusing the bodies cyclically
pub fn build_logs(resources: usize, scopes: usize, records: usize, bodies: &[AnyValue]) -> Logs {
    let mut logs = Logs::new();
    let mut index = 0;
    for r in 0..resources {
        let resource_logs = logs.append_resource_logs();
        resource_logs.schema_url = "https://opentelemetry.io/schemas/1.21.0".to_string();
        resource_logs.resource.attributes = vec![
            KeyValue::new("service.name", format!("nginx-{r}")),
            KeyValue::new("host.name", "edge-01"),
        ];
        for s in 0..scopes {
            let scope_logs = resource_logs.append_scope_logs();
            scope_logs.scope = InstrumentationScope {
                name: format!("app-protect-{s}"),
                version: "5.2.0".to_string(),
                attributes: Vec::new(),
            };
            for _ in 0..records {
                let record = scope_logs.append_log_record();
                record.time_unix_nano = 1_700_000_000_000_000_000 + index as u64;
                record.observed_time_unix_nano = record.time_unix_nano + 10;
                record.severity_number = SeverityNumber::WARN;
                record.severity_text = "WARN".to_string();
                record.attributes = record_attributes(index);
                record.trace_id = [7; 16];
                record.span_id = [3; 8];
                if !bodies.is_empty() {
                    record.body = bodies[index % bodies.len()].clone();
                }
                index += 1;
            }
        }
    }
    logs
}

/// All record bodies in traversal order
pub fn bodies(logs: &Logs) -> Vec<&AnyValue> {
    logs.resource_logs
        .iter()
        .flat_map(|r| &r.scope_logs)
        .flat_map(|s| &s.log_records)
        .map(|record| &record.body)
        .collect()
}

/// Copy of `logs` with every body cleared, for comparing everything else
pub fn without_bodies(logs: &Logs) -> Logs {
    let mut logs = logs.clone();
    for record in logs
        .resource_logs
        .iter_mut()
        .flat_map(|r| &mut r.scope_logs)
        .flat_map(|s| &mut s.log_records)
    {
        record.body = AnyValue::Empty;
    }
    logs
}
