//! Prompt assembly for the AI assistant.
//!
//! The assistant answers in Arabic using up to [`CONTEXT_ARTICLE_LIMIT`]
//! published articles as grounding. Provider transport lives in the API
//! crate; this module only decides what text is sent.

use crate::article::{excerpt, EXCERPT_CHARS};
use crate::error::CoreError;

/// Maximum number of articles quoted in an `ask` prompt.
pub const CONTEXT_ARTICLE_LIMIT: i64 = 3;

/// Completion budget for `ask`.
pub const ASK_MAX_TOKENS: u32 = 1024;

/// Completion budget for improvement suggestions.
pub const SUGGEST_MAX_TOKENS: u32 = 1500;

/// Sampling temperature for providers that accept one.
pub const TEMPERATURE: f32 = 0.7;

/// System message for `ask`.
pub const ASK_SYSTEM_PROMPT: &str = "أنت يمن بيديا، مساعد ذكي متخصص في الموسوعة اليمنية.";

/// System message for improvement suggestions.
pub const EDITOR_SYSTEM_PROMPT: &str = "أنت محرر خبير في يمن بيديا";

const ASK_PREAMBLE: &str = "أنت \"يمن بيديا\"، مساعد ذكي متخصص في الموسوعة اليمنية. مهمتك مساعدة المستخدمين في:
1. البحث عن المعلومات في الموسوعة
2. تقديم معلومات دقيقة عن اليمن (التاريخ، الثقافة، الجغرافيا، إلخ)
3. مساعدة المحررين في كتابة وتحسين المقالات
4. الإجابة على الأسئلة بأسلوب موسوعي علمي

المقالات ذات الصلة من الموسوعة:
";

const NO_CONTEXT_LINE: &str = "\nلا توجد مقالات ذات صلة في الموسوعة حالياً.\n";

const UNTITLED: &str = "بدون عنوان";

/// An article quoted as grounding.
#[derive(Debug, Clone)]
pub struct ContextArticle<'a> {
    pub title: &'a str,
    pub summary: Option<&'a str>,
    pub content: &'a str,
}

impl ContextArticle<'_> {
    /// The summary, or the opening of the body when there is none.
    fn gist(&self) -> &str {
        match self.summary {
            Some(s) if !s.is_empty() => s,
            _ => excerpt(self.content, EXCERPT_CHARS),
        }
    }
}

pub fn validate_question(question: &str) -> Result<(), CoreError> {
    if question.trim().is_empty() {
        return Err(CoreError::Validation("السؤال مطلوب".into()));
    }
    Ok(())
}

/// Build the full `ask` prompt: fixed preamble, numbered article list,
/// optional caller context, then the question.
pub fn build_ask_prompt(
    articles: &[ContextArticle<'_>],
    context: Option<&str>,
    question: &str,
) -> String {
    let mut prompt = String::from(ASK_PREAMBLE);

    if articles.is_empty() {
        prompt.push_str(NO_CONTEXT_LINE);
    } else {
        for (i, article) in articles.iter().enumerate() {
            prompt.push_str(&format!("\n{}. {}\n{}...\n", i + 1, article.title, article.gist()));
        }
    }

    if let Some(ctx) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\n\nسياق إضافي: {ctx}\n"));
    }

    prompt.push_str(&format!(
        "\n\nالسؤال: {question}\n\nالرجاء تقديم إجابة مفيدة ودقيقة بالعربية:"
    ));
    prompt
}

/// Build the editorial review prompt for a draft article.
pub fn build_improvement_prompt(title: Option<&str>, content: &str) -> String {
    let title = title.filter(|t| !t.trim().is_empty()).unwrap_or(UNTITLED);
    format!(
        "كمساعد للموسوعة اليمنية \"يمن بيديا\"، قم بمراجعة المقالة التالية واقترح تحسينات:

العنوان: {title}

المحتوى:
{content}

الرجاء تقديم:
1. تقييم عام للمقالة
2. اقتراحات للتحسين
3. معلومات إضافية يمكن إضافتها
4. ملاحظات حول الأسلوب والصياغة"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_question_rejected() {
        assert!(validate_question("  ").is_err());
        assert!(validate_question("ما هي عاصمة اليمن؟").is_ok());
    }

    #[test]
    fn ask_prompt_lists_articles_in_order() {
        let articles = [
            ContextArticle { title: "صنعاء", summary: Some("عاصمة اليمن"), content: "..." },
            ContextArticle { title: "عدن", summary: None, content: "مدينة ساحلية" },
        ];
        let prompt = build_ask_prompt(&articles, None, "أين تقع عدن؟");

        assert!(prompt.starts_with("أنت \"يمن بيديا\""));
        assert!(prompt.contains("\n1. صنعاء\nعاصمة اليمن...\n"));
        assert!(prompt.contains("\n2. عدن\nمدينة ساحلية...\n"));
        assert!(prompt.ends_with("السؤال: أين تقع عدن؟\n\nالرجاء تقديم إجابة مفيدة ودقيقة بالعربية:"));
        assert!(!prompt.contains("سياق إضافي"));
    }

    #[test]
    fn ask_prompt_without_articles_says_so() {
        let prompt = build_ask_prompt(&[], Some("للطلاب"), "سؤال");
        assert!(prompt.contains("لا توجد مقالات ذات صلة"));
        assert!(prompt.contains("سياق إضافي: للطلاب"));
    }

    #[test]
    fn empty_summary_falls_back_to_excerpt() {
        let body = "ب".repeat(EXCERPT_CHARS + 50);
        let articles = [ContextArticle { title: "t", summary: Some(""), content: &body }];
        let prompt = build_ask_prompt(&articles, None, "q");
        assert!(prompt.contains(&format!("{}...", "ب".repeat(EXCERPT_CHARS))));
        assert!(!prompt.contains(&"ب".repeat(EXCERPT_CHARS + 1)));
    }

    #[test]
    fn improvement_prompt_defaults_title() {
        let prompt = build_improvement_prompt(None, "نص المقالة");
        assert!(prompt.contains("العنوان: بدون عنوان"));
        assert!(prompt.contains("المحتوى:\nنص المقالة"));
    }
}
