//! Capabilities - recognition / translation seams
//!
//! Vision, voice and translation live outside this crate. Callers plug a
//! real backend in behind these traits; `Unavailable` answers "no match"
//! everywhere and is what the pipeline uses when nothing is configured.

/// Personnel identifier as carried by `PersonnelRecord::id`
pub type PersonnelId = String;

pub trait FaceRecognizer: Send + Sync {
    /// Identify the person in an encoded image, if anyone
    fn identify(&self, image: &[u8]) -> Option<PersonnelId>;
}

pub trait VoiceRecognizer: Send + Sync {
    /// Identify the speaker in an audio clip, if anyone
    fn identify_speaker(&self, audio: &[u8]) -> Option<PersonnelId>;

    fn transcribe(&self, audio: &[u8]) -> Option<String>;
}

pub trait Translator: Send + Sync {
    /// `None` when the language pair is not supported
    fn translate(&self, text: &str, source: &str, target: &str) -> Option<String>;
}

/// Backend that recognises nothing and translates nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl FaceRecognizer for Unavailable {
    fn identify(&self, _image: &[u8]) -> Option<PersonnelId> {
        None
    }
}

impl VoiceRecognizer for Unavailable {
    fn identify_speaker(&self, _audio: &[u8]) -> Option<PersonnelId> {
        None
    }

    fn transcribe(&self, _audio: &[u8]) -> Option<String> {
        None
    }
}

impl Translator for Unavailable {
    fn translate(&self, text: &str, source: &str, target: &str) -> Option<String> {
        // Identity pair is the one translation that needs no backend
        if source.eq_ignore_ascii_case(target) {
            Some(text.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFace(&'static str);

    impl FaceRecognizer for FixedFace {
        fn identify(&self, image: &[u8]) -> Option<PersonnelId> {
            (!image.is_empty()).then(|| self.0.to_string())
        }
    }

    #[test]
    fn test_unavailable_recognises_nobody() {
        assert_eq!(Unavailable.identify(b"\x89PNG"), None);
        assert_eq!(Unavailable.identify_speaker(b"RIFF"), None);
        assert_eq!(Unavailable.transcribe(b"RIFF"), None);
    }

    #[test]
    fn test_unavailable_translation() {
        assert_eq!(Unavailable.translate("Ready", "en", "hi"), None);
        assert_eq!(Unavailable.translate("Ready", "en", "EN"), Some("Ready".to_string()));
    }

    #[test]
    fn test_backends_are_object_safe() {
        let backends: Vec<Box<dyn FaceRecognizer>> = vec![Box::new(Unavailable), Box::new(FixedFace("IAF-0007"))];
        let found: Vec<_> = backends.iter().filter_map(|b| b.identify(b"jpeg")).collect();
        assert_eq!(found, vec!["IAF-0007".to_string()]);
    }
}
