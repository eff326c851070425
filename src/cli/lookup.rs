use anyhow::{bail, Result};
use std::str::FromStr;

use super::Context;
use crate::catalog;
use crate::model::ClueDevice;

pub async fn define(ctx: &Context, word: String) -> Result<()> {
    let definition = ctx.service()?.find_definition(&word).await?;
    println!("{}", definition);
    Ok(())
}

pub async fn synonyms(ctx: &Context, text: String) -> Result<()> {
    let synonyms = ctx.service()?.suggest_synonyms(&text).await?;
    if synonyms.is_empty() {
        println!("No synonyms found for {:?}", text.trim());
    }
    for synonym in synonyms {
        println!("{}", synonym);
    }
    Ok(())
}

/// Setter styles as reported by the service, or the built-in list offline.
pub async fn setters(ctx: &Context, offline: bool) -> Result<()> {
    if offline {
        for name in catalog::known_setters() {
            println!("{}", name);
        }
        return Ok(());
    }

    let metadata = ctx.service()?.setters().await?;
    let default = metadata.default_setter();
    for name in &metadata.setters {
        if Some(name.as_str()) == default {
            println!("{} (default)", name);
        } else {
            println!("{}", name);
        }
    }
    Ok(())
}

/// Describe a clue device or a setter. Runs locally.
pub fn explain(topic: &str) -> Result<String> {
    if let Ok(device) = ClueDevice::from_str(topic) {
        return Ok(format!(
            "{}: {}",
            device.label(),
            catalog::device_explanation(device)
        ));
    }
    if let Some(description) = catalog::setter_explanation(topic) {
        return Ok(format!("{}: {}", topic.trim(), description));
    }
    bail!(
        "Nothing known about {:?}. Try a clue device such as \"anagram\" or a setter such as \"Paul\".",
        topic
    )
}
