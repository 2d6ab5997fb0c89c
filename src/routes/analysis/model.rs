use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    routes::{key_safe, validate_symbol},
};

const MAX_TEXT_CHARS: usize = 5000;
const MAX_CONTEXT_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "Arabic",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    #[serde(default)]
    pub language: Language,
    pub context: Option<String>,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_symbol(&self.symbol)?;
        if let Some(context) = &self.context {
            if context.chars().count() > MAX_CONTEXT_CHARS {
                return Err(AppError::Validation(format!(
                    "`context` exceeds {} characters",
                    MAX_CONTEXT_CHARS
                )));
            }
        }
        Ok(())
    }

    pub fn cache_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.trim().to_uppercase()),
            ("language", self.language.as_str().to_string()),
        ];
        if let Some(context) = &self.context {
            params.push(("context", key_safe(context.trim())));
        }
        params
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are a financial market analyst. Give a concise technical and fundamental \
             outlook for the requested instrument. Answer in {}. Do not give personal \
             investment advice.",
            self.language.name()
        )
    }

    pub fn user_prompt(&self) -> String {
        match &self.context {
            Some(context) => format!(
                "Instrument: {}\nAdditional context: {}",
                self.symbol.trim(),
                context.trim()
            ),
            None => format!("Instrument: {}", self.symbol.trim()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub language: Language,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target: Language,
}

impl TranslateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let chars = self.text.trim().chars().count();
        if chars == 0 {
            return Err(AppError::Validation("`text` is required".to_string()));
        }
        if chars > MAX_TEXT_CHARS {
            return Err(AppError::Validation(format!(
                "`text` exceeds {} characters",
                MAX_TEXT_CHARS
            )));
        }
        Ok(())
    }

    pub fn cache_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("target", self.target.as_str().to_string()),
            ("text", key_safe(self.text.trim())),
        ]
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "Translate the user's financial news text into {}. Keep tickers, numbers and \
             proper nouns unchanged. Reply with the translation only.",
            self.target.name()
        )
    }
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub target: Language,
    pub translation: String,
}
