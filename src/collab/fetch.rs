// File: src/collab/fetch.rs
use crate::config::SourceLocation;
use crate::error::FetchError;
use std::fs;
use std::path::PathBuf;

pub trait SourceFetcher {
    fn fetch_text(&self) -> Result<String, FetchError>;
}

pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceFetcher for FileFetcher {
    fn fetch_text(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|e| FetchError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

pub struct HttpFetcher {
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch_text(&self) -> Result<String, FetchError> {
        let http_error = |e: reqwest::Error| FetchError::Http {
            url: self.url.clone(),
            source: e,
        };

        let response = reqwest::blocking::get(&self.url).map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_error)
    }
}

pub fn fetcher_for(location: &SourceLocation) -> Box<dyn SourceFetcher> {
    match location {
        SourceLocation::File(path) => Box::new(FileFetcher::new(path.clone())),
        SourceLocation::Url(url) => Box::new(HttpFetcher::new(url.clone())),
    }
}
