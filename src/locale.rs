use chrono::{Locale, Weekday};

/// Display locale of the summary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppLocale {
    #[default]
    PtBr,
    EnUs,
}

/// Fixed strings shown around the summary data.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub html_lang: &'static str,
    pub page_title: &'static str,
    pub range_joiner: &'static str,
    pub completed_prefix: &'static str,
    pub completed_of: &'static str,
    pub completed_suffix: &'static str,
    pub your_week: &'static str,
    pub empty_week: &'static str,
    pub completion_prefix: &'static str,
    pub completion_at: &'static str,
    pub undo: &'static str,
    pub new_goal: &'static str,
    pub goal_title: &'static str,
    pub weekly_frequency: &'static str,
    pub save_goal: &'static str,
    pub load_failed: &'static str,
    pub undo_failed: &'static str,
    pub complete_failed: &'static str,
    pub create_failed: &'static str,
}

const PT_BR: Labels = Labels {
    html_lang: "pt-BR",
    page_title: "in.orbit",
    range_joiner: "a",
    completed_prefix: "Você completou",
    completed_of: "de",
    completed_suffix: "metas nessa semana.",
    your_week: "Sua semana",
    empty_week: "Você ainda não completou nenhuma meta essa semana.",
    completion_prefix: "Você completou",
    completion_at: "às",
    undo: "Desfazer",
    new_goal: "Cadastrar meta",
    goal_title: "Qual a atividade?",
    weekly_frequency: "Quantas vezes na semana?",
    save_goal: "Salvar",
    load_failed: "Não foi possível carregar o resumo da semana.",
    undo_failed: "Não foi possível desfazer a conclusão.",
    complete_failed: "Não foi possível concluir a meta.",
    create_failed: "Não foi possível cadastrar a meta.",
};

const EN_US: Labels = Labels {
    html_lang: "en-US",
    page_title: "in.orbit",
    range_joiner: "to",
    completed_prefix: "You completed",
    completed_of: "of",
    completed_suffix: "goals this week.",
    your_week: "Your week",
    empty_week: "You have not completed any goal this week yet.",
    completion_prefix: "You completed",
    completion_at: "at",
    undo: "Undo",
    new_goal: "New goal",
    goal_title: "What is the activity?",
    weekly_frequency: "How many times a week?",
    save_goal: "Save",
    load_failed: "Could not load this week's summary.",
    undo_failed: "Could not undo the completion.",
    complete_failed: "Could not complete the goal.",
    create_failed: "Could not create the goal.",
};

impl AppLocale {
    /// Accepts BCP 47 (`pt-BR`) and POSIX (`pt_BR`) tags, case-insensitive.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" | "pt" => Some(Self::PtBr),
            "en-us" | "en" => Some(Self::EnUs),
            _ => None,
        }
    }

    pub fn chrono(self) -> Locale {
        match self {
            Self::PtBr => Locale::pt_BR,
            Self::EnUs => Locale::en_US,
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Self::PtBr => &PT_BR,
            Self::EnUs => &EN_US,
        }
    }

    pub fn week_start(self) -> Weekday {
        Weekday::Sun
    }

    pub fn weekday_format(self) -> &'static str {
        "%A"
    }

    pub fn day_month_format(self) -> &'static str {
        match self {
            Self::PtBr => "%-d de %B",
            Self::EnUs => "%B %-d",
        }
    }

    pub fn range_format(self) -> &'static str {
        "%d %b"
    }

    pub fn time_format(self) -> &'static str {
        match self {
            Self::PtBr => "%H:%Mh",
            Self::EnUs => "%H:%M",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_tags() {
        assert_eq!(AppLocale::parse("pt-BR"), Some(AppLocale::PtBr));
        assert_eq!(AppLocale::parse("pt_br"), Some(AppLocale::PtBr));
        assert_eq!(AppLocale::parse(" en-US "), Some(AppLocale::EnUs));
        assert_eq!(AppLocale::parse("fr-FR"), None);
    }
}
