//! Human-readable labels for well-known property names.

use std::collections::HashMap;
use std::sync::LazyLock;

const LABELS: &[(&str, &str)] = &[
    ("CharacterPool", "Character Count"),
    ("PoolFileName", "File Name"),
    // Character
    ("strFirstName", "First Name"),
    ("strLastName", "Last Name"),
    ("strNickName", "Nickname"),
    ("m_SoldierClassTemplateName", "Soldier Class"),
    ("CharacterTemplateName", "Character Template"),
    ("kAppearance", "Appearance"),
    ("Country", "Country"),
    ("AllowedTypeSoldier", "Can Be Soldier"),
    ("AllowedTypeVIP", "Can Be VIP"),
    ("AllowedTypeDarkVIP", "Can Be Dark VIP"),
    ("PoolTimestamp", "Created On"),
    ("BackgroundText", "Biography"),
    // Appearance
    ("nmHead", "Head"),
    ("iGender", "Gender"),
    ("iRace", "Race"),
    ("nmHaircut", "Haircut"),
    ("iHairColor", "Hair Color"),
    ("iFacialHair", "Facial Hair"),
    ("nmBeard", "Beard"),
    ("iSkinColor", "Skin Color"),
    ("iEyeColor", "Eye Color"),
    ("nmFlag", "Flag"),
    ("iVoice", "Voice"),
    ("iAttitude", "Attitude"),
    ("iArmorDeco", "Armor Decor"),
    ("iArmorTint", "Armor Color"),
    ("iArmorTintSecondary", "Secondary Armor Color"),
    ("iWeaponTint", "Weapon Color"),
    ("iTattooTint", "Tattoo Color"),
    ("nmWeaponPattern", "Weapon Pattern"),
    ("nmPawn", "Pawn"),
    ("nmTorso", "Torso"),
    ("nmArms", "Arms"),
    ("nmLegs", "Legs"),
    ("nmHelmet", "Helmet"),
    ("nmEye", "Eye"),
    ("nmTeeth", "Teeth"),
    ("nmFacePropLower", "Lower Face Prop"),
    ("nmFacePropUpper", "Upper Face Prop"),
    ("nmPatterns", "Patterns"),
    ("nmVoice", "Voice Model"),
    ("nmLanguage", "Language"),
    ("nmTattoo_LeftArm", "Left Arm Tattoo"),
    ("nmTattoo_RightArm", "Right Arm Tattoo"),
    ("nmScars", "Scars"),
    ("nmTorso_Underlay", "Torso Underlay"),
    ("nmArms_Underlay", "Arms Underlay"),
    ("nmLegs_Underlay", "Legs Underlay"),
    ("nmFacePaint", "Face Paint"),
    ("nmLeftArm", "Left Arm"),
    ("nmRightArm", "Right Arm"),
    ("nmLeftArmDeco", "Left Arm Decor"),
    ("nmRightArmDeco", "Right Arm Decor"),
    ("nmLeftForearm", "Left Forearm"),
    ("nmRightForearm", "Right Forearm"),
    ("nmThighs", "Thighs"),
    ("nmShins", "Shins"),
    ("nmTorsoDeco", "Torso Decor"),
    ("bGhostPawn", "Ghost Pawn"),
];

static TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LABELS.iter().copied().collect());

/// Label for `name`, or `name` itself when it has none.
pub fn label(name: &str) -> &str {
    TABLE.get(name).copied().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(label("strNickName"), "Nickname");
        assert_eq!(label("iArmorTintSecondary"), "Secondary Armor Color");
        assert_eq!(label("CharacterPool"), "Character Count");
    }

    #[test]
    fn unknown_name_falls_back() {
        assert_eq!(label("CharacterPoolSerializeHelper"), "CharacterPoolSerializeHelper");
    }

    #[test]
    fn no_duplicate_entries() {
        assert_eq!(TABLE.len(), LABELS.len());
    }
}
