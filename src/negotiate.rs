use crate::codec::Codec;
use crate::error::Error;
use std::collections::HashSet;

/// The encodings a client declared in its `Accept-Encoding` header.
///
/// Tokens are kept verbatim. Quality values are not interpreted, so
/// `gzip;q=0.5` is a distinct token that never matches `gzip`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptEncoding {
    tokens: Vec<String>,
}

impl AcceptEncoding {
    /// Splits a header value on commas, dropping the whitespace that follows each comma.
    pub fn parse(header: &str) -> Self {
        let tokens = header
            .split(',')
            .map(str::trim_start)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();

        Self { tokens }
    }

    /// Returns true if the client listed the codec's exact token.
    pub fn contains(&self, codec: Codec) -> bool {
        self.tokens
            .iter()
            .any(|token| token == codec.content_encoding())
    }

    /// Returns the raw tokens in header order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Server-side preference order among supported codecs, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingPriority {
    order: Vec<Codec>,
}

impl EncodingPriority {
    /// Creates a priority list; repeated codecs keep their first position.
    pub fn new<I>(codecs: I) -> Self
    where
        I: IntoIterator<Item = Codec>,
    {
        let mut seen = HashSet::new();
        let order = codecs
            .into_iter()
            .filter(|codec| seen.insert(*codec))
            .collect();

        Self { order }
    }

    /// Parses a comma-separated list of content-encoding tokens, e.g. `br,gzip,deflate`.
    pub fn from_tokens(list: &str) -> Result<Self, Error> {
        let codecs = list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                Codec::from_token(token).ok_or_else(|| Error::InvalidPriority(token.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(codecs))
    }

    /// Picks the first codec in priority order that the client accepts.
    ///
    /// Returns `None` when no header was sent or nothing overlaps, meaning
    /// the uncompressed source is served.
    pub fn negotiate(&self, accepted: Option<&AcceptEncoding>) -> Option<Codec> {
        let accepted = accepted?;
        self.order
            .iter()
            .copied()
            .find(|codec| accepted.contains(*codec))
    }

    /// Returns the 1-based position of a codec in this list.
    pub fn rank(&self, codec: Codec) -> Option<usize> {
        self.order
            .iter()
            .position(|candidate| *candidate == codec)
            .map(|index| index + 1)
    }

    /// Returns the codecs in priority order.
    pub fn codecs(&self) -> &[Codec] {
        &self.order
    }

    /// Number of codecs in the list.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no codec is enabled.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for EncodingPriority {
    /// `br`, then `gzip`, then `deflate`.
    fn default() -> Self {
        Self::new(Codec::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negotiate(header: &str) -> Option<Codec> {
        EncodingPriority::default().negotiate(Some(&AcceptEncoding::parse(header)))
    }

    #[test]
    fn test_parse_splits_on_comma_and_whitespace() {
        let accepted = AcceptEncoding::parse("gzip, deflate,br,  zstd");
        assert_eq!(accepted.tokens(), ["gzip", "deflate", "br", "zstd"]);
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        assert!(AcceptEncoding::parse("").tokens().is_empty());
        assert_eq!(AcceptEncoding::parse("gzip,, ").tokens(), ["gzip"]);
    }

    #[test]
    fn test_no_header_is_identity() {
        assert_eq!(EncodingPriority::default().negotiate(None), None);
    }

    #[test]
    fn test_single_encodings() {
        assert_eq!(negotiate("br"), Some(Codec::Brotli));
        assert_eq!(negotiate("gzip"), Some(Codec::Gzip));
        assert_eq!(negotiate("deflate"), Some(Codec::Deflate));
    }

    #[test]
    fn test_server_order_wins_over_header_order() {
        assert_eq!(negotiate("deflate, gzip"), Some(Codec::Gzip));
        assert_eq!(negotiate("deflate, gzip, br"), Some(Codec::Brotli));
        assert_eq!(negotiate("gzip, deflate, br"), Some(Codec::Brotli));
    }

    #[test]
    fn test_highest_priority_of_intersection() {
        let all = ["br", "gzip", "deflate"];
        for mask in 1u8..8 {
            let tokens: Vec<&str> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| *t)
                .collect();
            let expected = Codec::ALL
                .into_iter()
                .find(|c| tokens.contains(&c.content_encoding()));

            assert_eq!(negotiate(&tokens.join(", ")), expected, "tokens {tokens:?}");
        }
    }

    #[test]
    fn test_quality_values_are_literal() {
        assert_eq!(negotiate("gzip;q=0.5"), None);
        assert_eq!(negotiate("br;q=1.0, deflate"), Some(Codec::Deflate));
    }

    #[test]
    fn test_unsupported_is_identity() {
        assert_eq!(negotiate("identity"), None);
        assert_eq!(negotiate("zstd, compress"), None);
        assert_eq!(negotiate("*"), None);
    }

    #[test]
    fn test_custom_priority() {
        let priority = EncodingPriority::new([Codec::Deflate, Codec::Gzip]);
        let accepted = AcceptEncoding::parse("br, gzip, deflate");
        assert_eq!(priority.negotiate(Some(&accepted)), Some(Codec::Deflate));

        let accepted = AcceptEncoding::parse("br");
        assert_eq!(priority.negotiate(Some(&accepted)), None);
    }

    #[test]
    fn test_new_removes_duplicates() {
        let priority = EncodingPriority::new([Codec::Gzip, Codec::Brotli, Codec::Gzip]);
        assert_eq!(priority.codecs(), [Codec::Gzip, Codec::Brotli]);
    }

    #[test]
    fn test_rank() {
        let priority = EncodingPriority::default();
        assert_eq!(priority.rank(Codec::Brotli), Some(1));
        assert_eq!(priority.rank(Codec::Deflate), Some(3));
        assert_eq!(priority.len(), 3);

        let partial = EncodingPriority::new([Codec::Gzip]);
        assert_eq!(partial.rank(Codec::Brotli), None);
    }

    #[test]
    fn test_from_tokens() {
        let priority = EncodingPriority::from_tokens("gzip, br").unwrap();
        assert_eq!(priority.codecs(), [Codec::Gzip, Codec::Brotli]);
        assert!(EncodingPriority::from_tokens("").unwrap().is_empty());

        let err = EncodingPriority::from_tokens("br,zstd").unwrap_err();
        assert!(matches!(err, Error::InvalidPriority(ref token) if token == "zstd"));
    }
}
