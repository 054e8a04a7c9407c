/// Wall-clock timestamp as an RFC3339 UTC string, the format every
/// `completed_at` / `created_at` / ledger timestamp uses.
pub fn now_rfc3339_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap()
}
