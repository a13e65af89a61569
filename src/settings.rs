/// Flag that disables the cloud logging sink.
pub const ON_PREMISES_FLAG: &str = "--on-premises";
/// Flag that answers "yes" to every confirmation prompt.
pub const YES_FOR_ALL_FLAG: &str = "--yes-for-all";
/// Flag that targets the QBO sandbox company.
pub const SANDBOX_FLAG: &str = "--sandbox";

/// Process-wide run flags, derived once at startup and passed explicitly to the helpers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    pub on_premises: bool,
    pub yes_for_all: bool,
    pub sandbox: bool,
}

/// QBO company the label generator talks to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

impl Settings {
    /// Scan an argument list for the three run flags. Anything else is ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut settings = Settings::default();
        for arg in args {
            match arg.as_ref() {
                ON_PREMISES_FLAG => settings.on_premises = true,
                YES_FOR_ALL_FLAG => settings.yes_for_all = true,
                SANDBOX_FLAG => settings.sandbox = true,
                _ => {}
            }
        }
        settings
    }

    pub fn environment(&self) -> Environment {
        if self.sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    /// The cloud sink is only attempted off-premises.
    pub fn wants_cloud_logging(&self) -> bool {
        !self.on_premises
    }
}

/// Derive the run settings from the process arguments, skipping the program name.
pub fn initialize<I, S>(args: I) -> Settings
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Settings::from_args(args.into_iter().skip(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_leaves_everything_off() {
        let settings = initialize(["label-kit"]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.environment(), Environment::Production);
        assert!(settings.wants_cloud_logging());
    }

    #[test]
    fn flags_are_detected_anywhere_and_unknowns_ignored() {
        let settings = initialize([
            "label-kit",
            "--verbose",
            "--sandbox",
            "labels.csv",
            "--yes-for-all",
            "--on-premises",
        ]);
        assert!(settings.on_premises);
        assert!(settings.yes_for_all);
        assert!(settings.sandbox);
        assert_eq!(settings.environment().as_str(), "sandbox");
        assert!(!settings.wants_cloud_logging());
    }

    #[test]
    fn program_name_is_not_treated_as_a_flag() {
        let settings = initialize(["--sandbox"]);
        assert!(!settings.sandbox);
    }

    #[test]
    fn flags_must_match_exactly() {
        let settings = Settings::from_args(["--Sandbox", "--on-premises=true", "-y"]);
        assert_eq!(settings, Settings::default());
    }
}
