//! Slug derivation for events. The slug is derived from the event name
//! once at creation and stays immutable; collisions get a numeric suffix.

use crate::domain::ports::EventRepository;
use crate::error::AppError;
use slug::slugify;
use std::sync::Arc;

pub async fn unique_slug(repo: &Arc<dyn EventRepository>, name: &str) -> Result<String, AppError> {
    let base = {
        let s = slugify(name);
        if s.is_empty() { "event".to_string() } else { s }
    };

    if !repo.slug_exists(&base).await? {
        return Ok(base);
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !repo.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
