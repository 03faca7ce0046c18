//! Transactional id generation.

/// Generate a transactional id from the hostname and a nanosecond timestamp.
///
/// The broker fences out any producer instance that reuses a transactional id
/// with an older epoch, so the id must be unique per live producer instance.
/// This hostname-plus-timestamp form guarantees that for non-concurrent,
/// non-restarted single runs only: a restarted producer gets a fresh id and
/// therefore a fresh identity the broker cannot fence against. Long-lived
/// deployments should pass a stable id explicitly instead
/// (`--transactional-id` / `EOS_TRANSACTIONAL_ID`).
pub fn generate_transactional_id() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{host}-{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_embeds_timestamp_suffix() {
        let id = generate_transactional_id();
        let (host, nanos) = id.rsplit_once('-').expect("id has host-nanos form");
        assert!(!host.is_empty());
        nanos.parse::<i64>().expect("suffix is a nanosecond timestamp");
    }

    #[test]
    fn test_generated_ids_differ_across_calls() {
        let first = generate_transactional_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = generate_transactional_id();
        assert_ne!(first, second);
    }
}
