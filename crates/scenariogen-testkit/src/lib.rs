//! Fixtures shared by scenariogen tests.
//!
//! Keeping canned backend replies in one place avoids each crate inventing
//! its own slightly different "typical LLM output".

pub mod proptest;

use scenariogen_schema::{ArtifactKind, GenerationRequest};

/// What a backend typically returns when asked for plain Gherkin.
pub const FENCED_SCENARIOS: &str = "Sure! Here are the scenarios:\n```gherkin\nFeature: Cart\n\n**Scenario 1: Add item**\nScenario 1: Add item to cart\n  Given I am on the menu page\n  When I add \"Margherita\" to my cart\n  Then my cart contains 1 item\n\nScenario 2: Add the same item twice\n  Given my cart contains \"Margherita\"\n  When I add \"Margherita\" again\n  Then the quantity is 2\n```\n";

/// [`FENCED_SCENARIOS`] after cleanup.
pub const CLEAN_SCENARIOS: &str = "Sure! Here are the scenarios:\n\nFeature: Cart\n\n\nScenario: Add item to cart\n  Given I am on the menu page\n  When I add \"Margherita\" to my cart\n  Then my cart contains 1 item\n\nScenario: Add the same item twice\n  Given my cart contains \"Margherita\"\n  When I add \"Margherita\" again\n  Then the quantity is 2";

/// Headless test code wrapped in a dart fence.
pub const FENCED_TEST_CODE: &str = "```dart\nimport 'package:flutter_test/flutter_test.dart';\n\nvoid main() {\n  testWidgets('adds item to cart', (tester) async {\n    expect(1, 1);\n  });\n}\n```";

/// [`FENCED_TEST_CODE`] after cleanup.
pub const CLEAN_TEST_CODE: &str = "import 'package:flutter_test/flutter_test.dart';\n\nvoid main() {\n  testWidgets('adds item to cart', (tester) async {\n    expect(1, 1);\n  });\n}";

pub fn scenario_request(requirement: &str) -> GenerationRequest {
    GenerationRequest::new(ArtifactKind::ScenarioSet, requirement)
}

pub fn test_code_request(requirement: &str) -> GenerationRequest {
    GenerationRequest::new(ArtifactKind::TestCode, requirement)
}
