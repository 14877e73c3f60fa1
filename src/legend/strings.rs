/// Fixed legend labels, localized by the marker's accessibility language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegendStrings {
    /// Heading above the custom actions list.
    pub actions_title: &'static str,
    /// Heading above the input-label pills.
    pub input_labels_title: &'static str,
}

impl LegendStrings {
    /// English labels.
    pub const ENGLISH: Self = Self {
        actions_title: "Actions:",
        input_labels_title: "Input Labels:",
    };

    /// Labels for a BCP-47 tag such as `de` or `fr-CA`; unknown or missing
    /// tags fall back to English.
    pub fn for_language(tag: Option<&str>) -> Self {
        let primary = tag
            .and_then(|t| t.split(['-', '_']).next())
            .map(str::to_ascii_lowercase);
        match primary.as_deref() {
            Some("de") => Self {
                actions_title: "Aktionen:",
                input_labels_title: "Eingabelabels:",
            },
            Some("es") => Self {
                actions_title: "Acciones:",
                input_labels_title: "Etiquetas de entrada:",
            },
            Some("fr") => Self {
                actions_title: "Actions :",
                input_labels_title: "Libellés de saisie :",
            },
            _ => Self::ENGLISH,
        }
    }
}
