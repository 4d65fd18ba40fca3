//! Typed business profile collected from the questionnaire.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! choice_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Answer text as shown in the questionnaire.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum!(
    /// Q1: industry.
    Industry {
        Retail => "Retail",
        Education => "Education",
        Finance => "Finance",
        Healthcare => "Healthcare",
        FoodHospitality => "Food & Hospitality",
        Manufacturing => "Manufacturing",
        ProfessionalServices => "Professional Services",
        Technology => "Technology/Software",
    }
);

choice_enum!(
    /// Q2: where AI should help first.
    PrimaryGoal {
        RunSmoothly => "Run business smoothly",
        Compliance => "Stay compliant / manage policies",
        ImproveProducts => "Improve products or services",
        NotSure => "Not sure",
    }
);

choice_enum!(
    /// Q4: team comfort with AI tools.
    Experience {
        NoExperience => "No AI experience",
        TriedSimpleTools => "Tried simple AI tools",
        Occasional => "Use AI sometimes",
        Frequent => "Use AI often",
        Expert => "AI team expert",
        NotSure => "Not sure",
    }
);

choice_enum!(
    /// Q5: business data already kept.
    DataSize {
        NoData => "No data yet",
        Handful => "A handful of records",
        TensOfThousands => "Tens of thousands of records",
        HundredsOfThousands => "Hundreds of thousands to millions",
        TenMillionPlus => "10 million+ records",
        NotSure => "Not sure",
    }
);

choice_enum!(
    /// Q6: where the frontend runs.
    FrontendDeployment {
        AiCompany => "AI company – all parts",
        SoftwareTools => "Software tools only",
        Cloud => "Major cloud service",
        OnPremises => "Company servers (on-site)",
        NeedHelp => "Not sure – need help",
    }
);

choice_enum!(
    /// Q7: where the AI engine runs.
    BackendDeployment {
        AiCompany => "AI company – all only",
        Cloud => "Major cloud service",
        OnPremises => "Company servers (on-site)",
        NeedHelp => "Not sure – need help",
    }
);

/// Answers to the seven questionnaire items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub industry: Industry,
    pub goal: PrimaryGoal,
    /// Free-text desired outcome, e.g. "automate support".
    #[serde(default)]
    pub use_case: String,
    pub experience: Experience,
    pub data_size: DataSize,
    pub front_deployment: FrontendDeployment,
    pub back_deployment: BackendDeployment,
}

impl BusinessProfile {
    /// Render the profile as the query block used for retrieval and generation.
    pub fn query_text(&self) -> String {
        let use_case = self.use_case.trim();
        let use_case = if use_case.is_empty() { "Not specified" } else { use_case };
        format!(
            "BUSINESS PROFILE:\n\n\
             Industry: {}\n\
             Primary Goal: {}\n\
             Desired AI Outcome: {}\n\
             AI Experience Level: {}\n\
             Available Data Size: {}\n\
             Frontend Deployment Preference: {}\n\
             Backend Deployment Preference: {}\n",
            self.industry,
            self.goal,
            use_case,
            self.experience,
            self.data_size,
            self.front_deployment,
            self.back_deployment,
        )
    }
}
