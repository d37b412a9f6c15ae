pub fn session_snapshot_key(session_code: &str) -> String {
    format!("session_snapshot:{}", session_code)
}
