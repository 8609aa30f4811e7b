//! The text-generation seam.
//!
//! The engine only needs "send transcript, get back text", so resolvers
//! depend on this trait rather than on the HTTP client directly. Tests
//! substitute [`crate::testing::MockGenerator`].

use async_trait::async_trait;
use openrouter::{Client, Request};

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a completion request and return the model's text.
    async fn generate(&self, request: Request) -> Result<String, openrouter::Error>;
}

#[async_trait]
impl TextGenerator for Client {
    async fn generate(&self, request: Request) -> Result<String, openrouter::Error> {
        let response = self.complete(request).await?;
        Ok(response.text().to_string())
    }
}
