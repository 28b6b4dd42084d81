//! Message Replay Example
//!
//! Replays a captured log of window messages through the router and prints
//! what each one would trigger. Handy for checking a capture from the
//! browser devtools against the routing rules.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example replay -p yousign-embed-core -- <signature-link> <capture.json>
//! ```
//!
//! The capture is a JSON array of `{ "origin": ..., "data": ... }` objects,
//! for instance collected with:
//!
//! ```javascript
//! const capture = [];
//! window.addEventListener('message', (e) => capture.push({ origin: e.origin, data: e.data }));
//! // ... later
//! copy(JSON.stringify(capture));
//! ```
//!
//! Every event kind is treated as registered.

use std::{env, fs, process};

use serde::Deserialize;
use serde_json::Value;
use yousign_embed_core::{CallbackRegistry, EventKind, InboundMessage, MessageRouter, SignatureLink};

// Silence unused crate dependency warnings for example binary
use thiserror as _;
use tracing as _;
use url as _;

#[derive(Deserialize)]
struct CapturedMessage {
    origin: String,
    data: Value,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        print_help();
        process::exit(2);
    }

    let link = match SignatureLink::parse(&args[1], false) {
        Ok(link) => link,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let capture: Vec<CapturedMessage> = match fs::read_to_string(&args[2])
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(capture) => capture,
        Err(e) => {
            eprintln!("Error reading {}: {e}", args[2]);
            process::exit(1);
        }
    };

    let router = MessageRouter::new(link);
    let mut registry = CallbackRegistry::<()>::new();
    for kind in EventKind::ALL {
        if let Err(e) = registry.register(kind, ()) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    for (i, captured) in capture.iter().enumerate() {
        let message = InboundMessage::classify(&captured.data);
        let route = router.route(&captured.origin, &message, &registry);

        let mut effects = Vec::new();
        if let Some(kind) = route.callback {
            effects.push(format!("callback {kind}"));
        }
        if let Some(target) = &route.navigation {
            effects.push(format!("navigate {target}"));
        }
        if effects.is_empty() {
            effects.push("ignored".to_string());
        }

        println!("#{i:<4} {:<32} {}", captured.origin, effects.join(", "));
    }
}

fn print_help() {
    println!(
        r"Yousign message replay

USAGE:
    replay <SIGNATURE_LINK> <CAPTURE_JSON>

ARGS:
    <SIGNATURE_LINK>    Signature link the frame was opened with
    <CAPTURE_JSON>      File holding a JSON array of {{ origin, data }} objects"
    );
}
