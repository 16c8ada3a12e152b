use crate::models::{Intent, KeywordRule, RuleResponse};

pub const LAB_HOURS: &str = "Ariana Labs is open from 8:00 AM to 6:00 PM.";
pub const INVALID_MESSAGE_REPLY: &str = "Please enter a valid message.";
pub const APOLOGY_REPLY: &str = "Sorry, something went wrong. Please try again.";
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant giving health advice.";

pub const LAB_TESTS: &[&str] = &[
    "Insulin Dose Calculator",
    "Blood Urea Nitrogen (BUN) to Creatinine Ratio",
    "Estimated Glomerular Filtration Rate (eGFR)",
    "INR (International Normalized Ratio)",
    "Lipid Profile Calculation",
];

pub const TEST_CATALOG_HEADING: &str = "Here are the tests offered at Ariana Labs:";

/// Evaluated in order; the first rule with a matching keyword wins.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        intent: Intent::LabHours,
        keywords: &["hours", "lab hours", "open", "what time", "working hours"],
        response: RuleResponse::Static(LAB_HOURS),
    },
    KeywordRule {
        intent: Intent::TestCatalog,
        keywords: &["tests", "test names", "services", "diagnostic"],
        response: RuleResponse::NumberedList {
            heading: TEST_CATALOG_HEADING,
            items: LAB_TESTS,
        },
    },
];

/// Keys are lower-case and matched as substrings of the normalized message.
/// Insertion order breaks ties when several keys match.
pub const TEST_GUIDANCE: &[(&str, &str)] = &[
    (
        "insulin dose calculator",
        "To use the Insulin Dose Calculator safely:\n\
         1. Consult your healthcare team to set your insulin-to-carb ratio and correction factor.\n\
         2. Know your target blood glucose range.\n\
         3. Accurately count carbs in meals.\n\
         4. Never adjust settings on your own; always follow professional guidance.",
    ),
    (
        "creatinine ratio",
        "About the BUN to Creatinine Ratio:\n\
         1. It compares two kidney-related markers from a routine blood draw.\n\
         2. Stay normally hydrated before the test unless told otherwise.\n\
         3. Tell your doctor about recent high-protein diets or medications.\n\
         4. Results need interpretation by a healthcare professional.",
    ),
    (
        "egfr",
        "About the eGFR (Estimated Glomerular Filtration Rate):\n\
         1. It estimates kidney function from your blood creatinine level.\n\
         2. Age and sex are used in the calculation, so keep your records accurate.\n\
         3. Avoid heavy exercise the day before the test.\n\
         4. Discuss any result outside the normal range with your doctor.",
    ),
    (
        "normalized ratio",
        "About the INR (International Normalized Ratio):\n\
         1. It measures how long your blood takes to clot.\n\
         2. Keep taking blood thinners exactly as prescribed before the test.\n\
         3. Tell the lab about any new medications or supplements.\n\
         4. Only your healthcare team should change your dose based on the result.",
    ),
    (
        "lipid profile",
        "About the Lipid Profile Calculation:\n\
         1. Fast for 9 to 12 hours beforehand if your doctor asks you to.\n\
         2. Water is fine during the fasting period.\n\
         3. Avoid alcohol for 24 hours before the test.\n\
         4. Review cholesterol results with your healthcare provider.",
    ),
];

pub fn guidance_for(normalized: &str) -> Option<&'static str> {
    TEST_GUIDANCE
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|(_, guidance)| *guidance)
}
