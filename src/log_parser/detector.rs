use super::formats::Engine;
use super::parser::ConnectionExtractor;
use std::collections::HashMap;

const SAMPLE_SIZE: usize = 50;
const MIN_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct EngineDetectionResult {
    pub engine: Option<Engine>,
    pub confidence: f32,
}

/// Guesses which engine wrote `lines` from the first few non-empty lines.
pub fn detect_engine<S: AsRef<str>>(lines: &[S]) -> EngineDetectionResult {
    let mut scores: HashMap<Engine, f32> = HashMap::new();
    let extractors = Engine::ALL.map(ConnectionExtractor::new);

    let sample = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_SIZE);

    let mut total_lines = 0usize;
    for line in sample {
        total_lines += 1;
        for extractor in &extractors {
            let confidence = extractor.confidence(line);
            if confidence > 0.0 {
                *scores.entry(extractor.engine()).or_insert(0.0) += confidence;
            }
        }
    }

    if total_lines == 0 {
        return EngineDetectionResult {
            engine: None,
            confidence: 0.0,
        };
    }

    let mut best_engine = None;
    let mut best_score = 0.0;

    for (engine, score) in scores {
        let normalized_score = score / total_lines as f32;
        if normalized_score > best_score {
            best_score = normalized_score;
            best_engine = Some(engine);
        }
    }

    if best_score < MIN_CONFIDENCE {
        best_engine = None;
    }

    EngineDetectionResult {
        engine: best_engine,
        confidence: best_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_detection() {
        let lines = vec![
            "2025-08-31 06:31:53 UTC:10.0.128.64(35340):yuta@postgres:[2599]:LOG:  connection authorized: user=yuta database=postgres application_name=psql SSL enabled",
            "2025-08-31 06:32:10 UTC:10.0.128.64(35340):yuta@postgres:[2599]:LOG:  statement: SELECT 1",
            "",
        ];

        let result = detect_engine(&lines);
        assert_eq!(result.engine, Some(Engine::PostgreSql));
        assert!(result.confidence > 0.6);
    }

    #[test]
    fn test_mysql_detection() {
        let lines = vec![
            "2025-09-07T06:41:11.701820Z\t  252 Connect\ttest28@10.0.139.222 on appdb using TCP/IP".to_string(),
            "2025-09-07T06:41:11.702311Z\t  252 Query\tSELECT @@version_comment LIMIT 1".to_string(),
            "2025-09-07T06:41:15.118004Z\t  252 Quit\t".to_string(),
        ];

        let result = detect_engine(&lines);
        assert_eq!(result.engine, Some(Engine::MySql));
        assert!(result.confidence > 0.6);
    }

    #[test]
    fn test_unrecognised_lines() {
        let lines = ["hello world", "192.168.1.1 - - [16/Sep/2025:03:00:09 +0000] \"GET / HTTP/1.1\" 200 1"];
        let result = detect_engine(&lines);
        assert_eq!(result.engine, None);

        let empty: [&str; 0] = [];
        assert_eq!(detect_engine(&empty).engine, None);
    }
}
