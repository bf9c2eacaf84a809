// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn close_sets_status_message_and_timestamp() {
    let mut t = ActionTicket::new(
        TicketId::new("t-1"),
        SignatureId::new("sig-1"),
        None,
        TicketStatus::Open,
        1000,
    );
    t.close(TicketStatus::Resolved, "success", 2000);
    assert_eq!(t.status, TicketStatus::Resolved);
    assert_eq!(t.result_message, "success");
    assert_eq!(t.updated_at_ms, Some(2000));
    assert!(t.is_terminal());
}

#[test]
fn pending_review_is_not_terminal() {
    let t = ActionTicket::new(
        TicketId::new("t-1"),
        SignatureId::new("sig-1"),
        None,
        TicketStatus::PendingReview,
        1000,
    );
    assert!(!t.is_terminal());
}
