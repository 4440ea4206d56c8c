//! Vision prompt restating the semantic groups.

use crate::types::GroupingResult;

pub const SYSTEM_PROMPT: &str = "You are a UI reviewer comparing a design screenshot with a \
proposed component breakdown. Answer with a single JSON object only.";

pub fn build_prompt(grouping: &GroupingResult) -> String {
    let sections = grouping
        .layout_structure
        .as_ref()
        .map(|l| l.main_sections.join(", "))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let groups = grouping
        .groups
        .iter()
        .map(|g| {
            format!(
                "- {} | {} | \"{}\" | ({:.0},{:.0}) {:.0}x{:.0} | {} | {} members | section: {}",
                g.id,
                g.group_type,
                g.name,
                g.bounds.x,
                g.bounds.y,
                g.bounds.width,
                g.bounds.height,
                if g.description.is_empty() {
                    "-"
                } else {
                    g.description.as_str()
                },
                g.children.len(),
                g.properties.section.as_deref().unwrap_or("-"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"The screenshot shows the rendered screen. Structural analysis proposed these components
(id | type | name | bounds | description | members | section):
{groups}

Main sections: {sections}

Confirm, correct or rename each component against the screenshot. Keep the ids above so each
component can be traced back. Respond in JSON:
{{
  "components": [
    {{
      "id": "group id",
      "type": "button|text|card|navigation|input|list|image|container|other",
      "name": "...",
      "description": "...",
      "bounds": {{ "x": 0, "y": 0, "width": 0, "height": 0 }},
      "properties": {{}},
      "targetMapping": {{ "componentName": "Button", "props": {{}} }}
    }}
  ],
  "layout": {{ "structure": "single-column|grid|mixed", "responsive": true, "spacingUnits": 8 }},
  "designSystem": {{
    "colors": {{ "primary": "#hex", "secondary": "#hex", "background": "#hex", "text": "#hex" }},
    "typography": {{ "fontFamily": "...", "sizes": [], "weights": [] }},
    "spacing": [],
    "borderRadius": []
  }},
  "confidence": 0.0 to 1.0,
  "suggestions": ["..."]
}}"##
    )
}
