/// Bearer token together with the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub exp_unix_ts: u64, // UNIX TIMESTAMP
}

impl Token {
    pub fn new(value: String, exp_unix_ts: u64) -> Self {
        Self { value, exp_unix_ts }
    }

    /// Token issued at `issued_at` and valid for `expires_in` seconds.
    pub fn issued(value: String, issued_at: u64, expires_in: u64) -> Self {
        Self::new(value, issued_at.saturating_add(expires_in))
    }

    /// True while more than `buffer_seconds` of validity remain at `now`.
    pub fn is_fresh(&self, now: u64, buffer_seconds: u64) -> bool {
        !self.value.is_empty() && self.exp_unix_ts.saturating_sub(buffer_seconds) > now
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    #[test]
    fn fresh_only_strictly_before_buffer() {
        let now = 1_000;
        let token = Token::new("abc".into(), now + 100);
        assert!(token.is_fresh(now, 30));

        let boundary = Token::new("abc".into(), now + 30);
        assert!(!boundary.is_fresh(now, 30));
        assert!(boundary.is_fresh(now, 29));
    }

    #[test]
    fn buffer_larger_than_expiry_never_fresh() {
        let token = Token::new("abc".into(), 10);
        assert!(!token.is_fresh(0, 60));
    }

    #[test]
    fn empty_value_never_fresh() {
        assert!(!Token::new(String::new(), u64::MAX).is_fresh(0, 0));
    }
}
