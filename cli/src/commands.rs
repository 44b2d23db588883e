use std::io::Write;

use carousel_core::Command;
use serde_json::Value;

use crate::CliContext;

pub async fn send(ctx: &CliContext, command: Command) -> Result<(), String> {
    ctx.service.send(command).await.map_err(|e| e.to_string())
}

/// Send a raw notification. The payload is parsed as JSON, or passed as a
/// plain string when it isn't valid JSON.
pub async fn notify(ctx: &CliContext, name: &str, payload: Option<&str>) -> Result<(), String> {
    let payload = match payload {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        None => Value::Null,
    };
    ctx.service
        .notify(name, payload)
        .await
        .map_err(|e| e.to_string())
}

pub async fn show_status(ctx: &CliContext) -> Result<(), String> {
    let snapshot = ctx.service.snapshot().await.map_err(|e| e.to_string())?;

    println!("config:  {}", ctx.config_source());
    println!("page:    {} of {}", snapshot.current_page, snapshot.page_count);
    println!("mode:    {}", snapshot.mode);
    if let Some(overlay) = &snapshot.overlay {
        println!("hidden:  {overlay}");
    }
    let groups: Vec<_> = snapshot.visible_groups.iter().map(String::as_str).collect();
    println!("groups:  {}", groups.join(", "));
    println!("shown:   {}", snapshot.shown_widgets.join(", "));
    if snapshot.timers.is_empty() {
        println!("timers:  none");
    }
    for (kind, period) in &snapshot.timers {
        println!("timer:   {kind:?} {}ms", period.as_millis());
    }
    if !snapshot.ready {
        println!("(widget layer not ready)");
    }
    Ok(())
}

pub fn show_widgets(ctx: &CliContext) {
    let board = ctx.board.lock();
    if board.widgets().is_empty() {
        println!("No widgets configured");
        return;
    }

    println!("{:<24} {:<8} Tags", "Widget", "State");
    println!("{}", "-".repeat(60));
    for widget in board.widgets() {
        let state = if widget.hidden { "hidden" } else { "shown" };
        let tags: Vec<_> = widget.tags.iter().map(String::as_str).collect();
        println!("{:<24} {:<8} {}", widget.id, state, tags.join(", "));
    }
}

pub fn exit() -> Result<(), String> {
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
