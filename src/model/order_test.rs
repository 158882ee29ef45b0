use super::*;

// =============================================================
// OrderStatus
// =============================================================

#[test]
fn status_default_is_open() {
    assert_eq!(OrderStatus::default(), OrderStatus::Open);
}

#[test]
fn status_parses_wire_values() {
    assert_eq!("open".parse::<OrderStatus>(), Ok(OrderStatus::Open));
    assert_eq!("closed".parse::<OrderStatus>(), Ok(OrderStatus::Closed));
}

#[test]
fn status_rejects_unknown_value() {
    let err = "pending".parse::<OrderStatus>().unwrap_err();
    assert!(err.contains("pending"));
}

#[test]
fn status_display_matches_wire_value() {
    assert_eq!(OrderStatus::Closed.to_string(), "closed");
    assert_eq!(OrderStatus::Open.as_str(), "open");
}

// =============================================================
// OrderUpdate::close
// =============================================================

#[test]
fn close_sets_status_solution_and_server_time() {
    let update = OrderUpdate::close("replaced the power supply").unwrap();
    assert_eq!(update.status, Some(OrderStatus::Closed));
    assert_eq!(update.solution.as_deref(), Some("replaced the power supply"));
    assert_eq!(update.closed_at, Some(TimestampWrite::ServerTime));
}

#[test]
fn close_rejects_empty_solution() {
    assert!(OrderUpdate::close("").is_none());
}

#[test]
fn close_rejects_whitespace_solution() {
    assert!(OrderUpdate::close("   \n\t").is_none());
}

#[test]
fn close_keeps_solution_text_verbatim() {
    let update = OrderUpdate::close("  swapped fan  ").unwrap();
    assert_eq!(update.solution.as_deref(), Some("  swapped fan  "));
}

#[test]
fn default_update_is_empty() {
    assert!(OrderUpdate::default().is_empty());
    assert!(!OrderUpdate::close("done").unwrap().is_empty());
}
