use crate::case::CaseFields;

/// Persona and output contract sent ahead of every case.
pub const SYSTEM_INSTRUCTION: &str = r#"你是一位名叫"屁屁"的柯基情侣法官。
你的性格：可爱、幽默、正直、虽然是狗狗但是很有智慧，说话风格要带点"汪"或者可爱的语气词。
你的任务：分析情侣之间的争吵，判断谁的责任更大，并给出理由和建议。
受众：年轻情侣，主要是女孩子喜欢的风格，所以语气要温和但切中要害。

必须输出纯 JSON 格式。

JSON 结构要求:
{
  "analysis": "string (有趣的分析，100字左右)",
  "femaleResponsibility": number (0-100),
  "maleResponsibility": number (0-100),
  "verdictSummary": "string (一句话判决)",
  "winner": "female" | "male" | "tie",
  "advice": "string (爱的建议)"
}"#;

/// Render the per-case portion of the prompt.
pub fn case_prompt(case: &CaseFields) -> String {
    format!(
        "案件详情：{}\n👩 女方 ({}) 陈述：{}\n👨 男方 ({}) 陈述：{}\n\n请分析并输出 JSON 结果。",
        case.event_description,
        case.female_name,
        case.female_argument,
        case.male_name,
        case.male_argument,
    )
}

/// Full text block sent upstream: system instruction, blank line, case prompt.
pub fn build_prompt(case: &CaseFields) -> String {
    format!("{}\n\n{}", SYSTEM_INSTRUCTION, case_prompt(case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn prompt_starts_with_system_instruction() {
        let fields = CaseFields::from_value(&json!({}));
        let prompt = build_prompt(&fields);
        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        assert!(prompt.contains("\n\n案件详情：undefined"));
    }

    #[test]
    fn prompt_interpolates_every_field() {
        let fields = CaseFields::from_value(&json!({
            "eventDescription": "late for dinner",
            "femaleName": "Lily",
            "femaleArgument": "waited an hour",
            "maleName": "Tom",
            "maleArgument": "traffic jam",
        }));
        let prompt = case_prompt(&fields);
        assert!(prompt.contains("案件详情：late for dinner"));
        assert!(prompt.contains("女方 (Lily) 陈述：waited an hour"));
        assert!(prompt.contains("男方 (Tom) 陈述：traffic jam"));
    }

    proptest! {
        #[test]
        fn arbitrary_statements_survive_interpolation(female in ".*", male in ".*") {
            let fields = CaseFields::from_value(&json!({
                "femaleArgument": female.clone(),
                "maleArgument": male.clone(),
            }));
            let prompt = build_prompt(&fields);
            let female_part = format!("陈述：{}", female);
            let male_part = format!("陈述：{}", male);
            prop_assert!(prompt.contains(&female_part));
            prop_assert!(prompt.contains(&male_part));
        }
    }
}
