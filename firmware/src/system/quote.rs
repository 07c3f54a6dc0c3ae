//! Quotes printed on tap.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// Anything that can come up with a quote.
pub trait QuoteSource {
    /// # Errors
    ///
    /// Fails with `Error::Network` when the quote cannot be fetched and
    /// with `Error::Quote` when the answer makes no sense.
    fn fetch_quote(&mut self) -> Result<Quote>;
}

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    text: String,
    author: String,
}

/// Quote service answering a GET with a JSON array of quotes.
pub struct HttpQuoteSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpQuoteSource {
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch_quote(&mut self) -> Result<Quote> {
        log::debug!("Fetching quote from {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .text()?;
        decode(&body)
    }
}

fn decode(body: &str) -> Result<Quote> {
    let records: Vec<QuoteRecord> =
        serde_json::from_str(body).map_err(|err| Error::Quote(err.to_string()))?;
    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| Error::Quote(String::from("no quote in the answer")))?;
    Ok(Quote {
        text: record.text.trim().to_string(),
        author: record.author.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_answer_holds_quotes_it_takes_the_first() {
        let body = r#"[
            {"text": " Make it so. ", "author": "Picard", "id": 7},
            {"text": "Engage.", "author": "Picard"}
        ]"#;
        let quote = decode(body).unwrap();
        assert_eq!(quote.text, "Make it so.");
        assert_eq!(quote.author, "Picard");
    }

    #[test]
    fn when_answer_is_empty_it_fails() {
        assert!(matches!(decode("[]"), Err(Error::Quote(_))));
    }

    #[test]
    fn when_answer_is_not_json_it_fails() {
        assert!(matches!(decode("<html>"), Err(Error::Quote(_))));
    }
}
