//! Default trees for new pools and new characters.

use crate::document::{Document, POOL_FILE_NAME};
use crate::kind::NONE;
use crate::property::{Property, PropertyBag, StructValue};

pub const APPEARANCE: &str = "kAppearance";
pub const APPEARANCE_TYPE: &str = "TAppearance";

/// Appearance fields added by later game versions. Older records lack them,
/// and the game expects them to be present.
pub const LATE_APPEARANCE_FIELDS: [&str; 7] = [
    "nmTorsoDeco",
    "nmLeftForearm",
    "nmRightForearm",
    "nmLeftArmDeco",
    "nmRightArmDeco",
    "nmThighs",
    "nmShins",
];

/// An empty pool whose roster header names it `file_name`.
pub fn new_pool(file_name: &str) -> Document {
    let header = PropertyBag::from(vec![Property::text(POOL_FILE_NAME, file_name)]);
    Document::new(PropertyBag::from(vec![Property::roster(header, Vec::new())]))
}

/// A fresh soldier record. `created_on` is stored verbatim as the pool
/// timestamp.
pub fn new_character(nickname: &str, created_on: &str) -> PropertyBag {
    PropertyBag::from(vec![
        Property::text("strFirstName", "New"),
        Property::text("strLastName", ""),
        Property::text("strNickName", nickname),
        Property::name_value("CharacterTemplateName", "Soldier"),
        Property::name_value("m_SoldierClassTemplateName", "Rookie"),
        Property::name_value("Country", "Country_China"),
        default_appearance(),
        Property::bool("AllowedTypeSoldier", true),
        Property::bool("AllowedTypeVIP", false),
        Property::bool("AllowedTypeDarkVIP", false),
        Property::text("PoolTimestamp", created_on),
        Property::text("BackgroundText", ""),
    ])
}

/// The `kAppearance` struct of a new character.
pub fn default_appearance() -> Property {
    let name = |field: &str, value: &str| Property::name_value(field, value);
    let empty = |field: &str| Property::name_value(field, "");
    let int = |field: &str, value: i32| Property::int32(field, value);

    Property::structure(
        APPEARANCE,
        APPEARANCE_TYPE,
        vec![
            empty("nmHead"),
            int("iGender", 2),
            int("iRace", 2),
            empty("nmHaircut"),
            int("iHairColor", 0),
            int("iFacialHair", 0),
            empty("nmBeard"),
            int("iSkinColor", 0),
            int("iEyeColor", 0),
            empty("nmFlag"),
            int("iVoice", 0),
            int("iAttitude", 0),
            int("iArmorDeco", 0),
            int("iArmorTint", 0),
            int("iArmorTintSecondary", 0),
            int("iWeaponTint", 0),
            int("iTattooTint", 0),
            empty("nmWeaponPattern"),
            name("nmPawn", NONE),
            empty("nmTorso"),
            empty("nmArms"),
            empty("nmLegs"),
            empty("nmHelmet"),
            name("nmEye", "DefaultEyes"),
            name("nmTeeth", "DefaultTeeth"),
            empty("nmFacePropLower"),
            empty("nmFacePropUpper"),
            empty("nmPatterns"),
            empty("nmVoice"),
            name("nmLanguage", NONE),
            empty("nmTattoo_LeftArm"),
            empty("nmTattoo_RightArm"),
            empty("nmScars"),
            empty("nmTorso_Underlay"),
            empty("nmArms_Underlay"),
            empty("nmLegs_Underlay"),
            empty("nmFacePaint"),
            empty("nmLeftArm"),
            empty("nmRightArm"),
            empty("nmLeftArmDeco"),
            empty("nmRightArmDeco"),
            empty("nmLeftForearm"),
            empty("nmRightForearm"),
            empty("nmThighs"),
            name("nmShins", NONE),
            empty("nmTorsoDeco"),
        ],
    )
}

/// Append any of [`LATE_APPEARANCE_FIELDS`] missing from `appearance` as
/// empty names. Returns how many were added.
pub fn fill_missing_appearance_fields(appearance: &mut StructValue) -> usize {
    let mut added = 0;
    for field in LATE_APPEARANCE_FIELDS {
        if appearance.body.find(field).is_none() {
            appearance.body.push(Property::name_value(field, ""));
            added += 1;
        }
    }
    added
}
