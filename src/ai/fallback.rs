//! AI 서비스 장애 시 대체 문구
//!
//! 로딩 표시가 무한히 남지 않도록 서비스별/언어별 고정 문구를 반환합니다.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const CHAT_UNAVAILABLE: &str =
    "I'm sorry, I'm having trouble connecting to the AI service. Please try again later.";
pub const SUMMARY_UNAVAILABLE: &str = "Summarization service is currently unavailable.";

/// 서비스는 응답했지만 결과 필드가 비어있는 경우
pub const CHAT_EMPTY: &str = "I apologize, but I couldn't process your question. Please try again.";
pub const TRANSLATION_EMPTY: &str = "Translation not available";
pub const SUMMARY_EMPTY: &str = "Summary not available";

static TRANSLATION_PLACEHOLDERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hi", "यह पाठ हिंदी में अनुवादित किया जाना है। (Translation service loading...)"),
        ("ta", "இந்த உரை தமிழில் மொழிபெயர்க்கப்பட வேண்டும்। (Translation service loading...)"),
        ("te", "ఈ వచనం తెలుగులో అనువదించబడాలి। (Translation service loading...)"),
        ("bn", "এই পাঠ বাংলায় অনুবাদ করতে হবে। (Translation service loading...)"),
        ("mr", "हा मजकूर मराठीत भाषांतर करावा लागेल। (Translation service loading...)"),
        ("kn", "ಈ ಪಠ್ಯವನ್ನು ಕನ್ನಡದಲ್ಲಿ ಅನುವಾದಿಸಬೇಕು। (Translation service loading...)"),
        ("gu", "આ લખાણ ગુજરાતીમાં અનુવાદ કરવું પડશે। (Translation service loading...)"),
        ("pa", "ਇਸ ਲਿਖਤ ਦਾ ਪੰਜਾਬੀ ਵਿੱਚ ਅਨੁਵਾਦ ਕਰਨਾ ਪਵੇਗਾ। (Translation service loading...)"),
        ("ml", "ഈ വാചകം മലയാളത്തിൽ വിവർത്തനം ചെയ്യണം। (Translation service loading...)"),
        ("ur", "اس متن کا اردو میں ترجمہ کرنا ہوگا۔ (Translation service loading...)"),
        ("fr", "Ce texte doit être traduit en français. (Translation service loading...)"),
        ("es", "Este texto debe traducirse al español. (Translation service loading...)"),
        ("de", "Dieser Text muss ins Deutsche übersetzt werden. (Translation service loading...)"),
        ("ar", "يجب ترجمة هذا النص إلى العربية. (Translation service loading...)"),
        ("ru", "Этот текст нужно перевести на русский язык. (Translation service loading...)"),
        ("ja", "このテキストは日本語に翻訳する必要があります。 (Translation service loading...)"),
        ("zh", "此文本需要翻译成中文。 (Translation service loading...)"),
    ])
});

/// 번역 서비스 장애 시 대상 언어별 문구
pub fn translation_unavailable(target_lang: &str) -> String {
    TRANSLATION_PLACEHOLDERS
        .get(target_lang)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Translation to {target_lang} is loading... (Service starting up)"))
}
