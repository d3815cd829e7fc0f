//! Industry-group presets
//!
//! Groups are named fixed lists of display-space company labels used only to
//! pre-populate a selection. The custom group has no members; it falls back
//! to the first few available companies.

/// Name of the freeform group.
pub const CUSTOM_GROUP: &str = "カスタム";

#[derive(Debug, Clone)]
pub struct IndustryGroup {
    pub name: String,
    /// Display-space labels; membership is checked against the loaded table
    /// after translation to data names.
    pub members: Vec<String>,
}

impl IndustryGroup {
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// The built-in group presets.
pub fn default_groups() -> Vec<IndustryGroup> {
    vec![
        IndustryGroup::new(
            "イオングループ",
            &[
                "イオン北海道",
                "イオン九州",
                "マックスバリュ東海",
                "フジ・リテイリング",
                "U.S.M.H",
                "ツルハ",
            ],
        ),
        IndustryGroup::new(
            "ドラッグストア",
            &[
                "ツルハ",
                "マツキヨココカラ",
                "コスモス薬品",
                "クリエイトSD",
                "サンドラッグ",
                "スギ薬局",
                "クスリのアオキ",
            ],
        ),
        IndustryGroup::new(
            "ホームセンター",
            &["DCMHD", "コーナン", "コメリ", "アークランズ", "ジョイフル本田"],
        ),
        IndustryGroup::new("スーパーマーケット（全国）", &["PPIH", "トライアル"]),
        IndustryGroup::new(
            "スーパーマーケット（東日本）",
            &["イオン北海道", "アークス", "ヤオコー", "ライフ", "ベルク", "U.S.M.H"],
        ),
        IndustryGroup::new(
            "スーパーマーケット（西日本）",
            &[
                "平和堂",
                "バロー",
                "イズミ",
                "ライフ",
                "ハローズ",
                "マックスバリュ東海",
                "フジ・リテイリング",
            ],
        ),
        IndustryGroup::new(CUSTOM_GROUP, &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups_include_custom() {
        let groups = default_groups();
        let custom = groups.iter().find(|g| g.name == CUSTOM_GROUP).unwrap();
        assert!(custom.members.is_empty());
        assert_eq!(groups.len(), 7);
    }
}
