//! Signal Extraction — detect implicit distress and intent cues in a user message.
//!
//! Keyword/phrase matching (fast, no model call) in Vietnamese and English.
//! Each category is an independent pattern group; a message may hit several.
//! The extractor sits behind the [`SignalExtractor`] trait so a classifier can
//! replace it without touching scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::catalog::ActivityDomain;

// ── Categories ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    // Physiological
    SleepIssues,
    AnxietyPhysical,
    BreathingIssues,
    Pain,
    Fatigue,
    // Cognitive
    Overwhelm,
    Overthinking,
    RacingThoughts,
    // Emotional
    Anger,
    Sadness,
    Frustration,
    // Situational
    WorkStress,
    SocialConflict,
    // Disengagement
    Refusal,
    Shutdown,
    // Explicit activity requests
    RequestMusic,
    RequestBreathing,
    RequestRoutine,
    RequestJournaling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalGroup {
    Physiological,
    Cognitive,
    Emotional,
    Situational,
    Disengagement,
    ExplicitIntent,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 19] = [
        Self::SleepIssues,
        Self::AnxietyPhysical,
        Self::BreathingIssues,
        Self::Pain,
        Self::Fatigue,
        Self::Overwhelm,
        Self::Overthinking,
        Self::RacingThoughts,
        Self::Anger,
        Self::Sadness,
        Self::Frustration,
        Self::WorkStress,
        Self::SocialConflict,
        Self::Refusal,
        Self::Shutdown,
        Self::RequestMusic,
        Self::RequestBreathing,
        Self::RequestRoutine,
        Self::RequestJournaling,
    ];

    pub fn group(self) -> SignalGroup {
        match self {
            Self::SleepIssues
            | Self::AnxietyPhysical
            | Self::BreathingIssues
            | Self::Pain
            | Self::Fatigue => SignalGroup::Physiological,
            Self::Overwhelm | Self::Overthinking | Self::RacingThoughts => SignalGroup::Cognitive,
            Self::Anger | Self::Sadness | Self::Frustration => SignalGroup::Emotional,
            Self::WorkStress | Self::SocialConflict => SignalGroup::Situational,
            Self::Refusal | Self::Shutdown => SignalGroup::Disengagement,
            Self::RequestMusic
            | Self::RequestBreathing
            | Self::RequestRoutine
            | Self::RequestJournaling => SignalGroup::ExplicitIntent,
        }
    }

    /// The activity domain an explicit-intent category asks for.
    pub fn requested_domain(self) -> Option<ActivityDomain> {
        match self {
            Self::RequestMusic => Some(ActivityDomain::Music),
            Self::RequestBreathing => Some(ActivityDomain::Breathing),
            Self::RequestRoutine => Some(ActivityDomain::Routine),
            Self::RequestJournaling => Some(ActivityDomain::Journaling),
            _ => None,
        }
    }

    fn pattern(self) -> &'static Pattern {
        match self {
            Self::SleepIssues => &SLEEP,
            Self::AnxietyPhysical => &ANXIETY_PHYSICAL,
            Self::BreathingIssues => &BREATHING_ISSUES,
            Self::Pain => &PAIN,
            Self::Fatigue => &FATIGUE,
            Self::Overwhelm => &OVERWHELM,
            Self::Overthinking => &OVERTHINKING,
            Self::RacingThoughts => &RACING_THOUGHTS,
            Self::Anger => &ANGER,
            Self::Sadness => &SADNESS,
            Self::Frustration => &FRUSTRATION,
            Self::WorkStress => &WORK_STRESS,
            Self::SocialConflict => &SOCIAL_CONFLICT,
            Self::Refusal => &REFUSAL,
            Self::Shutdown => &SHUTDOWN,
            Self::RequestMusic => &REQUEST_MUSIC,
            Self::RequestBreathing => &REQUEST_BREATHING,
            Self::RequestRoutine => &REQUEST_ROUTINE,
            Self::RequestJournaling => &REQUEST_JOURNALING,
        }
    }
}

// ── Signal set ─────────────────────────────────────────────

/// Categories matched in one message. Ordered, so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet(BTreeSet<SignalCategory>);

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: SignalCategory) {
        self.0.insert(category);
    }

    pub fn contains(&self, category: SignalCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = SignalCategory> + '_ {
        self.0.iter().copied()
    }

    pub fn has_group(&self, group: SignalGroup) -> bool {
        self.iter().any(|c| c.group() == group)
    }

    pub fn has_explicit_intent(&self) -> bool {
        self.has_group(SignalGroup::ExplicitIntent)
    }

    /// First requested activity domain, in category order
    /// (music, breathing, routine, journaling).
    pub fn requested_domain(&self) -> Option<ActivityDomain> {
        self.iter().find_map(SignalCategory::requested_domain)
    }
}

impl FromIterator<SignalCategory> for SignalSet {
    fn from_iter<I: IntoIterator<Item = SignalCategory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Extractor capability ───────────────────────────────────

pub trait SignalExtractor: Send + Sync {
    /// Detect every signal category present in `message`. Pure and deterministic.
    fn extract(&self, message: &str) -> SignalSet;
}

/// Bilingual keyword matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSignalExtractor;

impl SignalExtractor for KeywordSignalExtractor {
    fn extract(&self, message: &str) -> SignalSet {
        let normalized = normalize(message);
        if normalized.is_empty() {
            return SignalSet::new();
        }
        SignalCategory::ALL
            .iter()
            .copied()
            .filter(|c| c.pattern().matches(&normalized))
            .collect()
    }
}

// ── Matching ───────────────────────────────────────────────

struct Pattern {
    /// Substrings matched anywhere in the message, so inflections count
    /// ("panic" hits "panicking").
    terms: &'static [&'static str],
    /// Terms that only count when they are the entire message.
    whole: &'static [&'static str],
}

impl Pattern {
    fn matches(&self, normalized: &str) -> bool {
        self.whole.iter().any(|w| normalized == *w)
            || self.terms.iter().any(|t| normalized.contains(t))
    }
}

/// Lowercase, trim, and strip trailing punctuation/emoji noise.
pub(crate) fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace('\u{2019}', "'")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Case-sensitive phrase search on word boundaries: `"ok"` matches "ok nhé" but not "book".
/// Used for short conversational tokens where a substring hit would be noise.
pub(crate) fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[start + term.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

pub(crate) fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| contains_term(haystack, t))
}

// ── Keyword sets ───────────────────────────────────────────

static SLEEP: Pattern = Pattern {
    terms: &[
        // Vietnamese
        "không ngủ được",
        "chẳng ngủ được",
        "mất ngủ",
        "khó ngủ",
        "trằn trọc",
        "thức trắng",
        "ngủ không ngon",
        "không ngủ nổi",
        // English
        "can't sleep",
        "cannot sleep",
        "couldn't sleep",
        "insomnia",
        "trouble sleeping",
        "no sleep",
        "awake all night",
    ],
    whole: &[],
};

static ANXIETY_PHYSICAL: Pattern = Pattern {
    terms: &[
        "lo quá",
        "lo lắng",
        "hồi hộp",
        "bồn chồn",
        "tim đập nhanh",
        "run tay",
        "run rẩy",
        "đổ mồ hôi",
        "hoảng",
        "anxious",
        "anxiety",
        "panic",
        "nervous",
        "heart racing",
        "racing heart",
        "shaking",
        "trembling",
    ],
    whole: &[],
};

static BREATHING_ISSUES: Pattern = Pattern {
    terms: &[
        "khó thở",
        "ngột ngạt",
        "nghẹt thở",
        "thở không nổi",
        "tức ngực",
        "can't breathe",
        "cannot breathe",
        "short of breath",
        "hard to breathe",
        "suffocating",
        "chest tight",
    ],
    whole: &[],
};

static PAIN: Pattern = Pattern {
    terms: &[
        "đau đầu",
        "nhức đầu",
        "đau bụng",
        "đau lưng",
        "đau nhức",
        "headache",
        "migraine",
        "aching",
        "stomach ache",
        "back pain",
        "hurts",
        "in pain",
    ],
    whole: &[],
};

static FATIGUE: Pattern = Pattern {
    terms: &[
        "mệt",
        "kiệt sức",
        "uể oải",
        "đuối",
        "hết năng lượng",
        "tired",
        "exhausted",
        "drained",
        "worn out",
        "burned out",
        "burnt out",
    ],
    whole: &[],
};

static OVERWHELM: Pattern = Pattern {
    terms: &[
        "quá tải",
        "ngập đầu",
        "không kham nổi",
        "nhiều việc quá",
        "không chịu nổi",
        "ngộp",
        "căng thẳng",
        "căng quá",
        "overwhelmed",
        "stress",
        "too much",
        "can't handle",
        "cannot handle",
        "drowning",
    ],
    whole: &[],
};

static OVERTHINKING: Pattern = Pattern {
    terms: &[
        "nghĩ nhiều",
        "suy nghĩ nhiều",
        "nghĩ mãi",
        "cứ nghĩ",
        "không ngừng nghĩ",
        "overthinking",
        "overthink",
        "can't stop thinking",
        "ruminating",
    ],
    whole: &[],
};

static RACING_THOUGHTS: Pattern = Pattern {
    terms: &[
        "đầu óc rối",
        "rối bời",
        "rối tung",
        "suy nghĩ lung tung",
        "đầu quay cuồng",
        "racing thoughts",
        "mind racing",
        "thoughts racing",
        "mind won't stop",
        "keeps racing",
        "racing mind",
        "head is spinning",
    ],
    whole: &[],
};

static ANGER: Pattern = Pattern {
    terms: &[
        "tức giận",
        "giận",
        "tức điên",
        "điên lắm",
        "cáu",
        "angry",
        "furious",
        "pissed",
        "enraged",
        "raging",
        "so mad",
    ],
    whole: &[],
};

static SADNESS: Pattern = Pattern {
    terms: &[
        "buồn",
        "chán nản",
        "khóc",
        "cô đơn",
        "tuyệt vọng",
        "trống rỗng",
        "sad",
        "lonely",
        "crying",
        "depressed",
        "hopeless",
        "empty inside",
    ],
    whole: &[],
};

static FRUSTRATION: Pattern = Pattern {
    terms: &[
        "bực",
        "bực bội",
        "khó chịu",
        "ức chế",
        "bế tắc",
        "frustrated",
        "frustrating",
        "annoyed",
        "fed up",
        "stuck",
    ],
    whole: &[],
};

static WORK_STRESS: Pattern = Pattern {
    terms: &[
        "công việc",
        "deadline",
        "sếp",
        "áp lực",
        "dự án",
        "đi làm",
        "thi cử",
        "bài tập về nhà",
        "bài kiểm tra",
        "at work",
        "my work",
        "working",
        "workload",
        "overworked",
        "boss",
        "job",
        "exams",
        "my exam",
        "final exam",
        "project",
        "office",
    ],
    whole: &[],
};

static SOCIAL_CONFLICT: Pattern = Pattern {
    terms: &[
        "cãi nhau",
        "mâu thuẫn",
        "bất hòa",
        "chia tay",
        "bị bỏ rơi",
        "bị phản bội",
        "argument",
        "fight with",
        "fought with",
        "broke up",
        "breakup",
        "betrayed",
        "conflict",
    ],
    whole: &[],
};

static REFUSAL: Pattern = Pattern {
    terms: &[
        "không muốn",
        "không cần",
        "thôi khỏi",
        "để sau",
        "don't want",
        "do not want",
        "no thanks",
        "not now",
        "leave me alone",
    ],
    whole: &["không", "ko", "no", "nope", "nah", "thôi", "khỏi"],
};

static SHUTDOWN: Pattern = Pattern {
    terms: &[
        "kệ",
        "mặc kệ",
        "sao cũng được",
        "không quan tâm",
        "buông xuôi",
        "chẳng sao cả",
        "whatever",
        "don't care",
        "doesn't matter",
        "i give up",
        "who cares",
    ],
    whole: &[],
};

static REQUEST_MUSIC: Pattern = Pattern {
    terms: &[
        "nhạc", "bài hát", "nghe nhạc", "music", "song", "songs", "playlist",
    ],
    whole: &[],
};

static REQUEST_BREATHING: Pattern = Pattern {
    terms: &[
        "hít thở",
        "bài tập thở",
        "tập thở",
        "breathing",
        "breathing exercise",
        "breathwork",
    ],
    whole: &[],
};

static REQUEST_ROUTINE: Pattern = Pattern {
    terms: &[
        "thói quen",
        "lịch trình",
        "kế hoạch ngày",
        "routine",
        "daily plan",
        "habit",
        "habits",
    ],
    whole: &[],
};

static REQUEST_JOURNALING: Pattern = Pattern {
    terms: &[
        "nhật ký",
        "viết ra",
        "viết nhật ký",
        "journal",
        "journaling",
        "write it down",
    ],
    whole: &[],
};

// ── Conversational cues ────────────────────────────────────
//
// Not signal categories: used by the timing gate and the continuation tier to
// pair a soft offer in the assistant's last turn with the user's reply.

const AGREEMENT_KW: &[&str] = &[
    "có",
    "ừ",
    "ừm",
    "ờ",
    "được",
    "được đó",
    "vâng",
    "dạ",
    "đồng ý",
    "thử xem",
    "thử đi",
    "oke",
    "ok",
    "okay",
    "yes",
    "yeah",
    "yep",
    "sure",
    "alright",
    "why not",
    "let's",
    "let's do it",
];

/// Phrases that negate the agreement itself. Plain "không"/"no"/"not" are not
/// here: "không sao", "why not" and a trailing "được không?" all assent.
const NEGATION_KW: &[&str] = &[
    "không được",
    "không muốn",
    "không cần",
    "không có",
    "không thích",
    "không thể",
    "không nổi",
    "không đâu",
    "chưa",
    "thôi khỏi",
    "thôi không",
    "thôi để sau",
    "để sau",
    "khỏi",
    "no thanks",
    "no thank you",
    "not now",
    "not today",
    "not really",
    "not in the mood",
    "no way",
    "don't want",
    "do not want",
    "don't feel like",
    "don't think so",
    "rather not",
    "maybe later",
    "i can't",
    "i won't",
];

/// Leading words that turn the whole reply into a decline ("không, cảm ơn").
const LEADING_DECLINE_KW: &[&str] = &["không", "ko", "no", "nope", "nah"];

/// Openers that start with a decline word but assent.
const ASSENTING_OPENERS: &[&str] = &["không sao", "không vấn đề", "no problem", "no worries"];

const INVITATION_KW: &[&str] = &[
    "bạn có muốn",
    "có muốn",
    "muốn thử",
    "thử cùng",
    "mình cùng",
    "cùng nhau",
    "mình thử",
    "bạn thử",
    "hay là",
    "gợi ý",
    "có thể giúp",
    "có thể dễ chịu",
    "nếu bạn muốn",
    "nếu bạn thấy ổn",
    "would you like",
    "do you want to",
    "want to try",
    "how about",
    "maybe try",
    "shall we",
    "we could",
    "small idea",
    "might help",
    "might feel good",
];

/// The user assents: an agreement token is present and nothing negates it.
///
/// "không được" carries "được" but is a refusal; "ừ, không sao" is not.
pub fn is_agreement(message: &str) -> bool {
    let normalized = normalize(message);
    if !contains_any(&normalized, AGREEMENT_KW) || contains_any(&normalized, NEGATION_KW) {
        return false;
    }
    !starts_with_decline(&normalized)
}

fn starts_with_decline(normalized: &str) -> bool {
    if ASSENTING_OPENERS.iter().any(|o| normalized.starts_with(o)) {
        return false;
    }
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .is_some_and(|first| LEADING_DECLINE_KW.contains(&first))
}

/// The assistant's utterance is a soft offer: either it uses offer phrasing,
/// or it names an activity and closes as a question ("…nghe nhạc nhé?").
pub fn has_invitation(assistant_message: &str) -> bool {
    let normalized = normalize(assistant_message);
    if contains_any(&normalized, INVITATION_KW) {
        return true;
    }
    let asks = assistant_message.trim_end().ends_with('?') || contains_term(&normalized, "nhé");
    asks && KeywordSignalExtractor
        .extract(assistant_message)
        .requested_domain()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> SignalSet {
        KeywordSignalExtractor.extract(text)
    }

    #[test]
    fn sleep_and_anxiety_detected_in_vietnamese() {
        let s = extract("Tôi không ngủ được mấy ngày nay, lo quá");
        assert!(s.contains(SignalCategory::SleepIssues));
        assert!(s.contains(SignalCategory::AnxietyPhysical));
        assert!(!s.has_explicit_intent());
    }

    #[test]
    fn english_cognitive_signals() {
        let s = extract("I keep overthinking everything and my mind racing at night");
        assert!(s.contains(SignalCategory::Overthinking));
        assert!(s.contains(SignalCategory::RacingThoughts));
    }

    #[test]
    fn multiple_groups_can_match() {
        let s = extract("Deadline dí quá, sếp thì cáu, mình mệt và khó thở");
        assert!(s.contains(SignalCategory::WorkStress));
        assert!(s.contains(SignalCategory::Anger));
        assert!(s.contains(SignalCategory::Fatigue));
        assert!(s.contains(SignalCategory::BreathingIssues));
        assert!(s.has_group(SignalGroup::Physiological));
        assert!(s.has_group(SignalGroup::Situational));
    }

    #[test]
    fn plain_text_yields_empty_set() {
        assert!(extract("Hôm nay trời nắng đẹp").is_empty());
        assert!(extract("").is_empty());
        assert!(extract("   ").is_empty());
    }

    #[test]
    fn explicit_request_maps_to_domain() {
        let s = extract("Cho mình nghe nhạc đi");
        assert!(s.contains(SignalCategory::RequestMusic));
        assert_eq!(s.requested_domain(), Some(ActivityDomain::Music));

        let s = extract("Can we do a breathing exercise?");
        assert_eq!(s.requested_domain(), Some(ActivityDomain::Breathing));

        let s = extract("Mình muốn viết nhật ký");
        assert_eq!(s.requested_domain(), Some(ActivityDomain::Journaling));
    }

    #[test]
    fn bare_refusal_only_matches_whole_message() {
        assert!(extract("không").contains(SignalCategory::Refusal));
        assert!(extract("No.").contains(SignalCategory::Refusal));
        // "không" inside a longer sentence is not a refusal
        assert!(!extract("tôi không biết nữa").contains(SignalCategory::Refusal));
    }

    #[test]
    fn cue_tokens_respect_word_boundaries() {
        assert!(contains_term("ok nhé", "ok"));
        assert!(!contains_term("facebook", "ok"));
        assert!(!contains_term("nothing", "no"));
        assert!(!extract("The workout was fun").contains(SignalCategory::WorkStress));
    }

    #[test]
    fn inflected_english_forms_match() {
        let s = extract("I'm panicking and my headaches are back");
        assert!(s.contains(SignalCategory::AnxietyPhysical));
        assert!(s.contains(SignalCategory::Pain));

        let s = extract("my mind keeps racing, I'm exhausted from working");
        assert!(s.contains(SignalCategory::RacingThoughts));
        assert!(s.contains(SignalCategory::Fatigue));
        assert!(s.contains(SignalCategory::WorkStress));
    }

    #[test]
    fn stress_words_are_detected() {
        assert!(extract("I'm so stressed lately").contains(SignalCategory::Overwhelm));
        assert!(extract("Dạo này mình căng thẳng lắm").contains(SignalCategory::Overwhelm));
    }

    #[test]
    fn breathing_request_is_not_homework() {
        let s = extract("Cho mình một bài tập thở");
        assert_eq!(s.requested_domain(), Some(ActivityDomain::Breathing));
        assert!(!s.contains(SignalCategory::WorkStress));
        assert!(extract("còn đống bài tập về nhà").contains(SignalCategory::WorkStress));
    }

    #[test]
    fn agreement_requires_no_decline() {
        assert!(is_agreement("yes"));
        assert!(is_agreement("Ừ, được đó"));
        assert!(is_agreement("ok!"));
        assert!(!is_agreement("không được"));
        assert!(!is_agreement("no thanks"));
        assert!(!is_agreement("hôm nay trời đẹp"));
    }

    #[test]
    fn casual_yes_replies_are_agreement() {
        assert!(is_agreement("ừ, không sao"));
        assert!(is_agreement("ok, thử xem được không"));
        assert!(is_agreement("yes, why not"));
        assert!(is_agreement("sure, I don't mind"));
        assert!(is_agreement("Không sao, thử đi"));
    }

    #[test]
    fn negated_agreement_is_a_decline() {
        assert!(!is_agreement("ok nhưng chưa phải lúc này"));
        assert!(!is_agreement("tôi không có thời gian"));
        assert!(!is_agreement("yes but not now"));
        assert!(!is_agreement("không, cảm ơn nhé, được rồi"));
        assert!(!is_agreement("nah, maybe later"));
        assert!(!is_agreement("I don't want to, sorry"));
    }

    #[test]
    fn invitation_phrases_detected() {
        assert!(has_invitation(
            "Bạn có muốn nghe một chút nhạc nhẹ không?"
        ));
        assert!(has_invitation("Would you like to try a short breathing exercise?"));
        assert!(has_invitation("Nếu bạn thấy ổn, mình thử cái này cùng nhau nhé:"));
        assert!(!has_invitation("Mình hiểu cảm giác đó."));
    }

    #[test]
    fn naming_an_activity_as_a_question_is_an_invitation() {
        assert!(has_invitation("Hay là mình nghe một chút nhạc nhẹ nhé?"));
        assert!(has_invitation("Viết nhật ký một chút nhé"));
        assert!(has_invitation("Some music?"));
        // A question without an activity is just conversation
        assert!(!has_invitation("Hôm nay của bạn thế nào?"));
        assert!(!has_invitation("I listened to music yesterday."));
    }
}
