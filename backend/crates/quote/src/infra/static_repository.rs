//! In-memory quote repository

use crate::domain::entities::Quote;
use crate::domain::repository::QuoteRepository;
use crate::error::{QuoteError, QuoteResult};
use rand::seq::IndexedRandom;
use std::path::Path;

const BUILTIN_QUOTES: &[(&str, &str)] = &[
    ("Life is 10% what happens to us and 90% how we react to it.", "Charles R. Swindoll"),
    ("It takes courage to grow up and become who you really are.", "E.E. Cummings"),
    (
        "Your self-worth is determined by you. You don't have to depend on someone telling you who you are.",
        "Beyoncé",
    ),
    ("Nothing is impossible. The word itself says 'I'm possible!'", "Audrey Hepburn"),
    (
        "Keep your face always toward the sunshine, and shadows will fall behind you.",
        "Walt Whitman",
    ),
    (
        "You have brains in your head. You have feet in your shoes. You can steer yourself any direction you choose. You're on your own. And you know what you know. And you are the guy who'll decide where to go.",
        "Dr. Seuss",
    ),
    ("Attitude is a little thing that makes a big difference.", "Winston Churchill"),
    (
        "To bring about change, you must not be afraid to take the first step. We will fail when we fail to try.",
        "Rosa Parks",
    ),
    ("All our dreams can come true, if we have the courage to pursue them.", "Walt Disney"),
    (
        "Don't sit down and wait for the opportunities to come. Get up and make them.",
        "Madam C.J. Walker",
    ),
    ("Champions keep playing until they get it right.", "Billie Jean King"),
    (
        "I am lucky that whatever fear I have inside me, my desire to win is always stronger.",
        "Serena Williams",
    ),
    ("You are never too old to set another goal or to dream a new dream.", "C.S. Lewis"),
    ("It is during our darkest moments that we must focus to see the light.", "Aristotle"),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
    ("Life shrinks or expands in proportion to one’s courage.", "Anaïs Nin"),
    (
        "Just don't give up trying to do what you really want to do. Where there is love and inspiration, I don't think you can go wrong.",
        "Ella Fitzgerald",
    ),
    ("Try to be a rainbow in someone's cloud.", "Maya Angelou"),
    ("If you don't like the road you're walking, start paving another one.", "Dolly Parton"),
    ("Real change, enduring change, happens one step at a time.", "Ruth Bader Ginsburg"),
    (
        "All dreams are within reach. All you have to do is keep moving towards them.",
        "Viola Davis",
    ),
];

/// Fixed, immutable set of quotes picked uniformly at random.
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteRepository {
    quotes: Vec<Quote>,
}

impl StaticQuoteRepository {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// The built-in set shipped with the server.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_QUOTES
                .iter()
                .map(|&(text, author)| Quote::new(text, author))
                .collect(),
        )
    }

    /// Load a JSON array of `{ "text": ..., "author": ... }` objects.
    pub async fn from_file(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| QuoteError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let quotes: Vec<Quote> =
            serde_json::from_str(&raw).map_err(|source| QuoteError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), count = quotes.len(), "Loaded quotes");
        Ok(Self::new(quotes))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl QuoteRepository for StaticQuoteRepository {
    async fn random_quote(&self) -> QuoteResult<Quote> {
        self.quotes
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(QuoteError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set() {
        let repo = StaticQuoteRepository::builtin();
        assert_eq!(repo.len(), 21);
        assert!(repo.quotes().iter().all(|q| !q.text.is_empty() && !q.author.is_empty()));
    }

    #[tokio::test]
    async fn test_random_quote_returns_member() {
        let repo = StaticQuoteRepository::builtin();
        for _ in 0..32 {
            let quote = repo.random_quote().await.unwrap();
            assert!(repo.quotes().contains(&quote));
        }
    }

    #[tokio::test]
    async fn test_empty_repository_not_found() {
        let repo = StaticQuoteRepository::default();
        assert!(repo.is_empty());
        assert!(matches!(
            repo.random_quote().await,
            Err(QuoteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_from_file() {
        let path = std::env::temp_dir().join(format!("quotes-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"text":"Stay hungry, stay foolish.","author":"Stewart Brand"}]"#,
        )
        .await
        .unwrap();

        let repo = StaticQuoteRepository::from_file(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.random_quote().await.unwrap().author, "Stewart Brand");
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let err = StaticQuoteRepository::from_file("/definitely/not/here.json")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Read { .. }));
    }

    #[tokio::test]
    async fn test_from_file_malformed() {
        let path = std::env::temp_dir().join(format!("quotes-bad-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"text": 1}"#).await.unwrap();

        let err = StaticQuoteRepository::from_file(&path).await.unwrap_err();
        let _ = tokio::fs::remove_file(&path).await;

        assert!(matches!(err, QuoteError::Parse { .. }));
    }
}
