//! Instruction payloads sent to the media service.
//!
//! Each stage that triggers a chat completion has one entry instruction —
//! the text sent as the final user message when the session enters that
//! stage.  [`entry_instruction`] is the lookup; [`evaluation_instruction`]
//! additionally embeds the reference pitch script, because the scoring
//! turn needs it for the originality dimension.
//!
//! The system prompt fixes the coach persona and embeds a design
//! vocabulary list; [`fetch_vocabulary`] can replace the built-in list
//! with one downloaded from a plain-text / CSV URL.

use crate::session::Stage;

// ---------------------------------------------------------------------------
// Stage entry instructions
// ---------------------------------------------------------------------------

const FREE_DESCRIPTION_INSTRUCTION: &str = "\
The student has just uploaded photos of their design artifact and is ready \
to start practising their pitch. Look at the photos and briefly describe \
the visual features you can see (form, material, colour, structure), then \
warmly invite the student into a 'think out loud' phase: ask them to freely \
share the concept and ideas behind the design, in their own words. Be \
encouraging and confident — your role is to help them express their \
existing work clearly, never to critique the design itself.";

const QA_IMPROVE_INSTRUCTION: &str = "\
The student has finished freely describing their artifact. Ask EXACTLY four \
questions to help them fill the gaps in their presentation — you are \
clarifying what they have already done, not suggesting design changes.\n\n\
For the first three questions, pick the three most helpful areas they have \
not yet explained clearly: context and users; methods and process; \
materials and craftsmanship; visual or interaction language; results and \
evaluation. Each question must be specific, answerable and at most twenty \
words — no yes/no questions.\n\n\
The fourth question is always: who is the target audience for this \
presentation — design professionals, or a non-design audience?\n\n\
Number the questions 1 to 4, one per line.";

const CONFIRM_SUMMARY_INSTRUCTION: &str = "\
From everything the student has said so far, write a concise summary \
(120-180 words, two or three short paragraphs) of the design points THEY \
want to express. Restate what the student said using professional design \
vocabulary — do not add new ideas, do not evaluate the design, and do not \
write a full speech yet. Close by asking the student to confirm whether \
the summary accurately reflects their intent.";

const GENERATE_PITCH_INSTRUCTION: &str = "\
The student has confirmed the summary. Write their three-minute spoken \
pitch: a single paragraph of at most 200 words, in English, suited to \
their stated target audience. Keep every idea the student's own — you are \
organising their language, not redesigning their work. Suggested arc: \
hook, background, design intent, process, materials and rationale, \
outcomes, impact.";

const EVALUATION_INSTRUCTION: &str = "\
The student has just practised the pitch aloud; their spoken delivery was \
transcribed above. Score the DELIVERY (not the design) on five dimensions, \
20 points each:\n\n\
1. Originality — how much of the wording was the student's own rather \
than a read-back of the generated script.\n\
2. Pronunciation — clarity of English pronunciation, including technical \
terms.\n\
3. Engaging Tone — intonation, emphasis and pauses that hold attention.\n\
4. Content Delivery — logical flow, completeness, clear key points.\n\
5. Time Management — within three minutes, at a steady pace.\n\n\
You MUST include these exact five lines in your reply so the scores can \
be charted:\n\
Originality: [score]/20\n\
Pronunciation: [score]/20\n\
Engaging Tone: [score]/20\n\
Content Delivery: [score]/20\n\
Time Management: [score]/20\n\n\
Then give specific, encouraging suggestions about how to DELIVER the pitch \
better — never about changing the design.";

const KEYWORDS_INSTRUCTION: &str = "\
Turn the pitch the student practised into a compact cheat sheet they can \
glance at on a phone while presenting. Include, in presentation order:\n\
1. Three to five core sentences lifted from the pitch.\n\
2. The key design vocabulary used, each with a one-line gloss.\n\
3. Transition phrases to fall back on when words escape them (openers, \
mid-talk connectors, closers).\n\
4. Memory hooks: numbers, measurements and easily-forgotten details.\n\
Keep it terse and scannable — this is a practical crib note, not a \
summary of the feedback.";

/// The instruction payload sent when the session enters `stage`.
///
/// `None` for [`Stage::Upload`] (nothing to say yet) and
/// [`Stage::PracticePitch`] (the student speaks; the coach listens).
pub fn entry_instruction(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Upload => None,
        Stage::FreeDescription => Some(FREE_DESCRIPTION_INSTRUCTION),
        Stage::QaImprove => Some(QA_IMPROVE_INSTRUCTION),
        Stage::ConfirmSummary => Some(CONFIRM_SUMMARY_INSTRUCTION),
        Stage::GeneratePitch => Some(GENERATE_PITCH_INSTRUCTION),
        Stage::PracticePitch => None,
        Stage::Evaluation => Some(EVALUATION_INSTRUCTION),
        Stage::Keywords => Some(KEYWORDS_INSTRUCTION),
    }
}

/// The evaluation instruction with the reference pitch script appended,
/// so the coach can judge originality against what was generated.
pub fn evaluation_instruction(pitch: Option<&str>) -> String {
    match pitch {
        Some(script) => format!(
            "{EVALUATION_INSTRUCTION}\n\nReference pitch script:\n{script}"
        ),
        None => EVALUATION_INSTRUCTION.to_string(),
    }
}

// ---------------------------------------------------------------------------
// System prompt & vocabulary
// ---------------------------------------------------------------------------

/// Built-in fallback vocabulary, used when no list is configured or the
/// download fails.
pub const DEFAULT_VOCABULARY: &str = "\
Prototype, Iteration, User Study, Material, Texture, Ergonomics, \
Sustainability, Functionality, Balance, Harmony, Contrast, Hierarchy, \
Affordance, Form Factor, Tactile Feedback";

/// Build the coach persona system prompt with `vocabulary` embedded.
///
/// Pass `None` to embed [`DEFAULT_VOCABULARY`].
pub fn system_prompt(vocabulary: Option<&str>) -> String {
    let vocabulary = vocabulary.unwrap_or(DEFAULT_VOCABULARY);
    format!(
        "You are a design-English pitch coach. Your sole task is to help a \
design student express their existing work clearly in a spoken \
three-minute English pitch.\n\n\
Principles:\n\
- You observe and describe the visual features of the artifact so the \
student can name them in English; you never judge the design or suggest \
design changes.\n\
- Your focus is always expression: clarity, logical flow, vocabulary \
choice, and how engaging the presentation is.\n\
- Reply in the language the student uses; the final pitch and cheat \
sheet are always in English.\n\
- Stay positive and encouraging throughout.\n\n\
Design vocabulary — prefer these terms naturally in anything you \
generate:\n{vocabulary}"
    )
}

/// Download a replacement vocabulary list from a plain-text URL.
///
/// Google Sheets share links are rewritten to their CSV export form, the
/// same trick the sheet itself uses for "File → Download as CSV".  Any
/// failure is the caller's cue to fall back to [`DEFAULT_VOCABULARY`].
pub async fn fetch_vocabulary(url: &str) -> anyhow::Result<String> {
    let url = rewrite_sheets_url(url);
    log::info!("prompt: downloading vocabulary list from {url}");

    let response = reqwest::get(&url).await?.error_for_status()?;
    let text = response.text().await?;
    if text.trim().is_empty() {
        anyhow::bail!("vocabulary download was empty");
    }
    Ok(text)
}

/// Rewrite a Google Sheets share URL to its CSV export endpoint; any
/// other URL passes through unchanged.
fn rewrite_sheets_url(url: &str) -> String {
    let Some(start) = url.find("/spreadsheets/d/") else {
        return url.to_string();
    };
    let id_start = start + "/spreadsheets/d/".len();
    let id: String = url[id_start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        return url.to_string();
    }

    let gid = url
        .split_once("gid=")
        .map(|(_, rest)| {
            rest.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| "0".to_string());

    format!("https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RubricScores;

    #[test]
    fn silent_stages_have_no_instruction() {
        assert!(entry_instruction(Stage::Upload).is_none());
        assert!(entry_instruction(Stage::PracticePitch).is_none());
    }

    #[test]
    fn speaking_stages_have_instructions() {
        for stage in [
            Stage::FreeDescription,
            Stage::QaImprove,
            Stage::ConfirmSummary,
            Stage::GeneratePitch,
            Stage::Evaluation,
            Stage::Keywords,
        ] {
            assert!(entry_instruction(stage).is_some(), "{stage:?}");
        }
    }

    /// The format block the evaluation prompt pins down must itself be
    /// recoverable by the rubric parser, otherwise the two sides of the
    /// contract have drifted apart.
    #[test]
    fn evaluation_format_block_round_trips_through_the_parser() {
        let sample = EVALUATION_INSTRUCTION
            .replace("[score]", "15");
        assert!(RubricScores::parse(&sample).is_some());
    }

    #[test]
    fn evaluation_instruction_embeds_the_pitch() {
        let with = evaluation_instruction(Some("my pitch text"));
        assert!(with.contains("my pitch text"));
        let without = evaluation_instruction(None);
        assert!(!without.contains("Reference pitch script"));
    }

    #[test]
    fn system_prompt_embeds_vocabulary() {
        assert!(system_prompt(None).contains("Ergonomics"));
        assert!(system_prompt(Some("Cantilever, Patina")).contains("Cantilever"));
    }

    // ---- Sheets URL rewriting ---

    #[test]
    fn sheets_share_link_becomes_csv_export() {
        let url = "https://docs.google.com/spreadsheets/d/abc123-XY_z/edit#gid=42";
        assert_eq!(
            rewrite_sheets_url(url),
            "https://docs.google.com/spreadsheets/d/abc123-XY_z/export?format=csv&gid=42"
        );
    }

    #[test]
    fn sheets_link_without_gid_defaults_to_zero() {
        let url = "https://docs.google.com/spreadsheets/d/abc123/edit";
        assert!(rewrite_sheets_url(url).ends_with("gid=0"));
    }

    #[test]
    fn non_sheets_urls_pass_through() {
        let url = "https://example.com/vocab.txt";
        assert_eq!(rewrite_sheets_url(url), url);
    }
}
