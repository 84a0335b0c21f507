//! Lexicon-based sentiment scoring in the style of VADER.
//!
//! Scores are produced for bar-chart display: negative, neutral and positive
//! proportions (summing to ~1) plus a normalised compound score in [-1, 1].

use serde::Serialize;

/// Normalisation constant for the compound score.
const ALPHA: f64 = 15.0;
/// Scalar increase/decrease from a booster word directly before a term.
const BOOSTER_INCR: f64 = 0.293;
/// Emphasis added by an all-caps term in mixed-case text.
const CAPS_INCR: f64 = 0.733;
/// Multiplier applied to a term under negation.
const NEGATION_SCALAR: f64 = -0.74;
/// Emphasis per exclamation mark (capped at 4).
const EXCLAIM_INCR: f64 = 0.292;

#[rustfmt::skip]
const LEXICON: &[(&str, f64)] = &[
    ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8), ("awesome", 3.1),
    ("wonderful", 2.7), ("fantastic", 2.6), ("love", 3.2), ("loved", 2.9), ("like", 1.5),
    ("liked", 1.8), ("nice", 1.8), ("happy", 2.7), ("glad", 2.0), ("pleased", 1.9),
    ("best", 3.2), ("better", 1.9), ("beautiful", 2.9), ("brilliant", 2.8), ("success", 2.7),
    ("successful", 2.8), ("win", 2.8), ("won", 2.7), ("benefit", 2.0), ("benefits", 2.0),
    ("effective", 2.1), ("efficient", 1.8), ("improve", 1.9), ("improved", 2.1),
    ("improvement", 2.0), ("positive", 2.6), ("strong", 2.3), ("clear", 1.6), ("safe", 1.9),
    ("helpful", 1.8), ("useful", 1.9), ("enjoy", 2.2), ("enjoyed", 2.3), ("fun", 2.3),
    ("perfect", 2.7), ("recommend", 1.5), ("support", 1.7), ("thanks", 1.9), ("thank", 1.5),
    ("welcome", 2.0), ("hope", 1.9), ("trust", 2.3), ("calm", 1.3), ("easy", 1.9),
    ("fair", 1.3), ("favorable", 2.1), ("gain", 2.4), ("growth", 1.6), ("profit", 1.9),
    ("reliable", 1.9), ("right", 1.4), ("secure", 1.4), ("smart", 1.7), ("superb", 3.1),
    ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5), ("worst", -3.1),
    ("worse", -2.1), ("hate", -2.7), ("hated", -3.2), ("dislike", -1.6), ("poor", -2.1),
    ("sad", -2.1), ("angry", -2.3), ("upset", -1.6), ("fail", -2.5), ("failed", -2.3),
    ("failure", -2.3), ("problem", -1.7), ("problems", -1.7), ("issue", -1.0),
    ("risk", -1.1), ("risks", -1.1), ("loss", -1.3), ("losses", -1.7), ("lose", -1.7),
    ("lost", -1.3), ("damage", -2.2), ("danger", -2.4), ("dangerous", -2.1), ("harm", -2.5),
    ("harmful", -2.3), ("wrong", -2.1), ("error", -1.7), ("errors", -1.4), ("crisis", -3.1),
    ("decline", -1.5), ("weak", -1.9), ("difficult", -1.5), ("hard", -0.4), ("pain", -2.3),
    ("painful", -2.4), ("fear", -2.2), ("afraid", -2.0), ("worry", -1.9), ("worried", -1.2),
    ("concern", -0.9), ("concerns", -0.9), ("unfortunately", -1.8), ("annoying", -1.7),
    ("broken", -2.1), ("useless", -1.8), ("boring", -1.3), ("disappointed", -1.9),
    ("disappointing", -2.2), ("violence", -3.1), ("death", -2.9), ("dead", -3.3),
    ("kill", -3.7), ("killed", -3.5), ("war", -2.9), ("threat", -2.4), ("attack", -2.1),
    ("stress", -1.8), ("ugly", -2.3), ("unsafe", -2.3), ("negative", -2.7), ("reject", -1.7),
    ("rejected", -2.3), ("penalty", -2.0), ("guilty", -1.8), ("sick", -2.3), ("abuse", -3.2),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "cannot", "can't", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't",
    "weren't", "won't", "wouldn't", "shouldn't", "couldn't", "hardly", "rarely",
];

const BOOSTERS_UP: &[&str] = &[
    "very", "really", "extremely", "incredibly", "absolutely", "completely", "highly",
    "hugely", "so", "totally", "especially", "particularly", "remarkably", "truly",
];

const BOOSTERS_DOWN: &[&str] = &[
    "slightly", "somewhat", "barely", "marginally", "partly", "kinda", "kind", "sort",
    "little", "occasionally",
];

/// Polarity proportions plus compound score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
}

/// Data for one sentiment bar chart; rendering is left to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentChart {
    pub title: String,
    pub scores: SentimentScores,
    pub bars: Vec<ChartBar>,
}

impl SentimentChart {
    pub fn new(title: impl Into<String>, text: &str) -> Self {
        let scores = polarity_scores(text);
        Self {
            title: title.into(),
            bars: vec![
                ChartBar { label: "negative", value: scores.negative },
                ChartBar { label: "neutral", value: scores.neutral },
                ChartBar { label: "positive", value: scores.positive },
                ChartBar { label: "compound", value: scores.compound },
            ],
            scores,
        }
    }
}

fn lookup(word: &str) -> Option<f64> {
    LEXICON.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

fn clean(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

fn is_shouting(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !token.chars().any(|c| c.is_lowercase())
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Score `text`. Empty or lexicon-free text is fully neutral.
pub fn polarity_scores(text: &str) -> SentimentScores {
    let raw: Vec<&str> = text.split_whitespace().map(clean).filter(|t| !t.is_empty()).collect();
    let lower: Vec<String> = raw.iter().map(|t| t.to_lowercase()).collect();

    // Caps emphasis only means something when the text isn't all caps.
    let mixed_case = raw.iter().any(|t| !is_shouting(t)) && raw.iter().any(|t| is_shouting(t));

    let mut valences = Vec::with_capacity(lower.len());
    for (i, word) in lower.iter().enumerate() {
        let Some(mut v) = lookup(word) else {
            valences.push(0.0);
            continue;
        };

        if mixed_case && is_shouting(raw[i]) {
            v += CAPS_INCR.copysign(v);
        }

        // Look back up to three tokens for boosters and negations.
        for back in 1..=3usize {
            let Some(prev) = i.checked_sub(back).map(|j| lower[j].as_str()) else {
                break;
            };
            let damp = 1.0 - 0.05 * (back as f64 - 1.0);
            if BOOSTERS_UP.contains(&prev) {
                v += (BOOSTER_INCR * damp).copysign(v);
            } else if BOOSTERS_DOWN.contains(&prev) {
                v -= (BOOSTER_INCR * damp).copysign(v);
            }
            if NEGATIONS.contains(&prev) || prev.ends_with("n't") {
                v *= NEGATION_SCALAR;
            }
        }
        valences.push(v);
    }

    let mut sum: f64 = valences.iter().sum();
    if sum != 0.0 {
        let exclaims = text.matches('!').count().min(4) as f64;
        sum += (exclaims * EXCLAIM_INCR).copysign(sum);
    }

    let compound = if sum == 0.0 {
        0.0
    } else {
        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    };

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for v in &valences {
        if *v > 0.0 {
            pos_sum += v + 1.0;
        } else if *v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neu_count += 1.0;
        }
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total == 0.0 {
        return SentimentScores {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
            compound: 0.0,
        };
    }

    SentimentScores {
        negative: round3(neg_sum.abs() / total),
        neutral: round3(neu_count / total),
        positive: round3(pos_sum / total),
        compound: round3(compound),
    }
}
