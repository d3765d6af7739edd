//! Lexicon-based text classifier

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use common::error::{Error, Result};
use common::models::{ModelVariant, Prediction, TrainingMetrics};

use crate::model::Model;
use crate::params::{input_object, parameter_object, string_field, type_name};

/// Task assumed when training parameters do not name one
pub const DEFAULT_TASK: &str = "sentiment-analysis";

/// Model type recorded in every artifact
pub const MODEL_TYPE: &str = "simple_rule_based";

/// Nominal accuracy reported after training
pub const NOMINAL_ACCURACY: f64 = 0.92;

/// Nominal F1 score reported after training
pub const NOMINAL_F1_SCORE: f64 = 0.89;

/// Confidence reported for tasks other than sentiment analysis
pub const GENERIC_CONFIDENCE: f64 = 0.75;

/// Ceiling for sentiment scores
pub const MAX_SENTIMENT_SCORE: f64 = 0.95;

const NEUTRAL_SCORE: f64 = 0.5;

const POSITIVE_WORDS: [&str; 10] = [
    "good", "great", "excellent", "amazing", "wonderful",
    "fantastic", "love", "best", "awesome", "perfect",
];

const NEGATIVE_WORDS: [&str; 10] = [
    "bad", "terrible", "awful", "poor", "horrible",
    "worst", "hate", "disappointing", "useless", "fail",
];

/// Classifier configuration, also the artifact layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Task the classifier answers
    pub task: String,
    
    /// Always `simple_rule_based`
    pub model_type: String,
    
    /// Optional free-form model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    
    /// Set once training completed
    pub trained: bool,
}

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Sentiment analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    pub score: f64,
}

/// Scores a text by counting lexicon words it contains
///
/// Each lexicon word counts at most once and matches anywhere in the
/// lower-cased text, including inside longer words.
pub fn score_sentiment(text: &str) -> SentimentScore {
    let text = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count();
    
    let (sentiment, hits) = if positive > negative {
        (Sentiment::Positive, positive)
    } else if negative > positive {
        (Sentiment::Negative, negative)
    } else {
        return SentimentScore {
            sentiment: Sentiment::Neutral,
            score: NEUTRAL_SCORE,
        };
    };
    
    // 0.6 + 0.1 per hit, computed in tenths to keep the values exact
    let score = ((6 + hits) as f64 / 10.0).min(MAX_SENTIMENT_SCORE);
    
    SentimentScore { sentiment, score }
}

/// Rule-based classifier
#[derive(Debug, Default)]
pub struct Classifier {
    config: Option<ClassifierConfig>,
}

impl Classifier {
    /// Creates an unfitted classifier
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Active configuration, if trained or loaded
    pub fn config(&self) -> Option<&ClassifierConfig> {
        self.config.as_ref()
    }
    
    fn fitted(&self) -> Result<&ClassifierConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| Error::ModelNotFitted("classifier has not been trained or loaded".to_string()))
    }
}

impl Model for Classifier {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Nlp
    }
    
    fn is_fitted(&self) -> bool {
        self.config.is_some()
    }
    
    fn train(&mut self, data: &Value, parameters: &Value) -> Result<TrainingMetrics> {
        let data = input_object(data, "nlp training data")?;
        let parameters = parameter_object(parameters)?;
        
        let task = string_field(parameters, "task")?.unwrap_or(DEFAULT_TASK);
        let model_name = string_field(parameters, "model_name")?;
        let samples = data.get("texts").and_then(Value::as_array).map_or(0, Vec::len);
        
        debug!("Configured {} classifier from {} texts", task, samples);
        
        self.config = Some(ClassifierConfig {
            task: task.to_string(),
            model_type: MODEL_TYPE.to_string(),
            model_name: model_name.map(str::to_string),
            trained: true,
        });
        
        Ok(TrainingMetrics::Classification {
            accuracy: NOMINAL_ACCURACY,
            f1_score: NOMINAL_F1_SCORE,
            samples,
        })
    }
    
    fn predict(&self, input: &Value) -> Result<Prediction> {
        let config = self.fitted()?;
        let input = input_object(input, "prediction input")?;
        
        let text = match input.get("text") {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "text must be a string, got {}",
                    type_name(other)
                )))
            }
        };
        
        if config.task == DEFAULT_TASK {
            let result = score_sentiment(text);
            let confidence = result.score;
            Prediction::new(&result, Some(confidence))
        } else {
            Prediction::new(&json!({ "result": "processed" }), Some(GENERIC_CONFIDENCE))
        }
    }
    
    fn load(&mut self, artifact: &Value) -> Result<()> {
        let config = ClassifierConfig::deserialize(artifact)
            .map_err(|e| Error::InvalidInput(format!("malformed classifier artifact: {}", e)))?;
        
        if config.model_type != MODEL_TYPE {
            return Err(Error::InvalidInput(format!(
                "unknown classifier model type: {}",
                config.model_type
            )));
        }
        
        if !config.trained {
            return Err(Error::InvalidInput("classifier artifact was never trained".to_string()));
        }
        
        self.config = Some(config);
        Ok(())
    }
    
    fn artifact(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.fitted()?)?)
    }
}
