//! Request and response types for the Inworld API.
//!
//! These types mirror the service's JSON contract. Field names on the wire are
//! lowerCamelCase. Fields the service treats as optional are skipped when
//! empty; the rest are always sent, with unset lists encoded as `null`.
//! Enumerations decode unknown values to an `Unrecognized` variant.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_zero_f32(value: &f32) -> bool {
    *value == 0.0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

/// Integers carried as decimal strings on the wire.
mod string_i64 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(value),
            Raw::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

/// Output-only counters attached to scenes and characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    pub total_common_knowledge: i32,
    pub goals_version: i32,
    pub total_triggers: i32,
    pub total_characters: i32,
}

/// Paging and filtering shared by list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Items per page. The service default is 50; zero means unset.
    pub page_size: Option<u32>,
    /// Token from a previous page. Other parameters must stay unchanged.
    pub page_token: Option<String>,
    /// AIP-160 filter, e.g. `scene.name=workspaces/{w}/scenes/{id}`.
    pub filter: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenes
// ─────────────────────────────────────────────────────────────────────────────

/// A scene in a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    /// Output only: `workspaces/{workspace}/scenes/{scene}`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// What happens in the scene.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Assigned triggers.
    pub scene_triggers: Option<Vec<SceneTrigger>>,
    /// User-specified name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Output only.
    pub meta: Option<Meta>,
    /// Common knowledge resource names.
    pub common_knowledge: Option<Vec<String>>,
    /// Current time period.
    pub time_period: String,
    /// Characters taking part in the scene.
    pub characters: Option<Vec<SceneCharacterReference>>,
    pub inworld_tags: Option<Vec<Value>>,
    pub default_scene_assets: SceneAssets,
}

/// Images attached to a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneAssets {
    pub scene_img: String,
    pub scene_img_original: String,
}

/// Reference from a scene to one of its characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneCharacterReference {
    /// `workspaces/{workspace}/characters/{character}`.
    pub character: String,
    /// Output only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_title: String,
    /// Output only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_uri: String,
}

/// Trigger assigned to a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneTrigger {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trigger: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// How much of a scene [`ScenesApi::get`](crate::api::ScenesApi::get) returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneItemView {
    #[serde(rename = "SCENE_ITEM_VIEW_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SCENE_ITEM_VIEW_DEFAULT")]
    Default,
    #[serde(rename = "SCENE_ITEM_VIEW_WITH_META")]
    WithMeta,
}

impl SceneItemView {
    /// Wire value used in the `view` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SceneItemView::Unspecified => "SCENE_ITEM_VIEW_UNSPECIFIED",
            SceneItemView::Default => "SCENE_ITEM_VIEW_DEFAULT",
            SceneItemView::WithMeta => "SCENE_ITEM_VIEW_WITH_META",
        }
    }
}

/// Parameters for listing scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScenesRequest {
    /// Workspace id. Required.
    pub workspace_id: String,
    /// Paging and filtering.
    pub page: PageRequest,
}

/// One page of scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListScenesResponse {
    pub scenes: Vec<Scene>,
    pub next_page_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Common knowledge
// ─────────────────────────────────────────────────────────────────────────────

/// A piece of knowledge shared by characters and scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonKnowledge {
    /// Output only: `workspaces/{workspace}/common-knowledge/{id}`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Free-form records, at most 255 characters each and 10000 in total.
    pub memory_records: Option<Vec<String>>,
    pub inworld_tags: Option<Vec<Value>>,
}

/// Parameters for listing common knowledge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCommonKnowledgeRequest {
    /// Workspace id. Required.
    pub workspace_id: String,
    /// Paging and filtering.
    pub page: PageRequest,
}

/// One page of common knowledge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListCommonKnowledgeResponse {
    pub common_knowledge: Vec<CommonKnowledge>,
    pub next_page_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Characters
// ─────────────────────────────────────────────────────────────────────────────

/// A character in a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    /// Output only: `workspaces/{workspace}/characters/{character}`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub default_character_description: CharacterDescription,
    pub default_character_assets: CharacterAssets,
    pub initial_mood: CharacterInitialMood,
    pub personality: CharacterPersonality,
    /// Common knowledge resource names.
    pub common_knowledge: Option<Vec<String>>,
    pub social_rank: f32,
    pub scenes: Option<Vec<Value>>,
    pub personal_knowledge: Option<PersonalKnowledge>,
    /// Output only.
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub emotional_fluidity: f32,
    pub share_portal_info: Value,
    pub yaml_config: String,
    /// Safety level per topic.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub safety_config: BTreeMap<String, SafetyLevel>,
    pub relationship: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_control: Option<CognitiveControl>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    pub behavioral_contexts: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fourth_wall: String,
    pub inworld_tags: Option<Vec<Value>>,
    pub user_tags: Option<Vec<Value>>,
    pub long_term_coherence: LongTermCoherence,
}

/// Long-term memory switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTermCoherence {
    pub enabled: bool,
}

/// Voice and avatar of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterAssets {
    pub voice: Voice,
    pub avatar_img: String,
    pub avatar_img_original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_type: Option<AvatarType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_display_image_source: Option<AvatarDisplayImageSource>,
    pub rpm_avatar: RpmAvatar,
    pub innequin_avatar: InnequinAvatar,
}

/// Core description of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterDescription {
    /// Name the character is introduced with. Required on create.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub given_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronoun: Option<Pronoun>,
    pub nicknames: Option<Vec<String>>,
    pub motivation: String,
    pub wikipedia_uri: String,
    pub example_dialog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_dialog_style: Option<ExampleDialogStyle>,
    pub personality_adjectives: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_stage: Option<LifeStage>,
    pub hobby_or_interests: Option<Vec<String>>,
    pub character_role: String,
    pub narrative_actions_enabled: bool,
    pub custom_dialog_styles: Option<Vec<CustomDialogStyle>>,
    pub flaws: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_response_length: Option<DialogResponseLength>,
    pub external_description: String,
}

/// Starting mood sliders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterInitialMood {
    pub joy: i32,
    pub fear: i32,
    pub trust: i32,
    pub surprise: i32,
}

/// Personality sliders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterPersonality {
    pub positive: i32,
    pub peaceful: i32,
    pub open: i32,
    pub extravert: i32,
}

/// User-defined dialog style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomDialogStyle {
    pub uuid: String,
    pub display_name: String,
    pub is_active: bool,
    pub adjectives: Option<Vec<String>>,
    pub colloquialism: String,
}

/// Single fact known to a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fact {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// Facts only this character knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalKnowledge {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
}

/// Innequin avatar settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnequinAvatar {
    pub avatar_background: String,
    pub avatar_material: String,
    pub avatar_img_uri: String,
    pub avatar_img_original_uri: String,
}

/// Ready Player Me avatar settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RpmAvatar {
    pub rpm_model_uri: String,
    pub rpm_image_uri: String,
    pub rpm_image_uri_portrait: String,
    pub rpm_image_uri_posture: String,
}

/// Whether and how fast the relationship with the user evolves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub enabled: bool,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub fluidity: f64,
}

/// Voice of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Voice {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_type: Option<TtsType>,
    pub pitch: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub speaking_rate: f64,
    pub robotic_voice_filter_level: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_metadata: Option<ElevenLabsMetadata>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gender: String,
}

/// Voice settings specific to ElevenLabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElevenLabsMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub voice_id: String,
}

/// Which image represents the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarDisplayImageSource {
    #[serde(rename = "AVATAR_DISPLAY_IMAGE_SOURCE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "RPM_IMAGE")]
    RpmImage,
    #[serde(rename = "INNEQUIN_IMAGE")]
    InnequinImage,
    #[serde(rename = "USER_PROVIDED_IMAGE")]
    UserProvidedImage,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Avatar flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarType {
    #[serde(rename = "AVATAR_TYPE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "AVATAR_TYPE_RPM")]
    Rpm,
    #[serde(rename = "AVATAR_TYPE_INWORLD")]
    Inworld,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// How much of a character [`CharactersApi::get`](crate::api::CharactersApi::get) returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterItemView {
    #[serde(rename = "CHARACTER_ITEM_VIEW_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "CHARACTER_ITEM_VIEW_DEFAULT")]
    Default,
    #[serde(rename = "CHARACTER_ITEM_VIEW_WITH_META")]
    WithMeta,
}

impl CharacterItemView {
    /// Wire value used in the `view` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CharacterItemView::Unspecified => "CHARACTER_ITEM_VIEW_UNSPECIFIED",
            CharacterItemView::Default => "CHARACTER_ITEM_VIEW_DEFAULT",
            CharacterItemView::WithMeta => "CHARACTER_ITEM_VIEW_WITH_META",
        }
    }
}

/// How much of each character a list call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterView {
    #[serde(rename = "CHARACTER_VIEW_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "CHARACTER_VIEW_DEFAULT")]
    Default,
    #[serde(rename = "CHARACTER_VIEW_WITH_SCENES")]
    WithScenes,
}

impl CharacterView {
    /// Wire value used in the `view` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CharacterView::Unspecified => "CHARACTER_VIEW_UNSPECIFIED",
            CharacterView::Default => "CHARACTER_VIEW_DEFAULT",
            CharacterView::WithScenes => "CHARACTER_VIEW_WITH_SCENES",
        }
    }
}

/// How strictly the character stays on topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CognitiveControl {
    #[serde(rename = "COGNITIVE_CONTROL_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "COGNITIVE_CONTROL_NONE")]
    None,
    #[serde(rename = "COGNITIVE_CONTROL_MILD")]
    Mild,
    #[serde(rename = "COGNITIVE_CONTROL_STRICT")]
    Strict,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Preferred reply length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogResponseLength {
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_VERY_SHORT")]
    VeryShort,
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_SHORT")]
    Short,
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_MEDIUM")]
    Medium,
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_LONG")]
    Long,
    #[serde(rename = "DIALOG_RESPONSE_LENGTH_VERY_LONG")]
    VeryLong,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Preset dialog style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExampleDialogStyle {
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_DEFAULT")]
    Default,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_BUBBLY")]
    Bubbly,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_FORMAL")]
    Formal,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_BLUNT")]
    Blunt,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_INQUISITIVE")]
    Inquisitive,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_COMMANDING")]
    Commanding,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_EMPATHETIC")]
    Empathetic,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_ENTERTAINING")]
    Entertaining,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_HYPOCHONDRIAC")]
    Hypochondriac,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_LAIDBACK")]
    Laidback,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_LONG_WINDED")]
    LongWinded,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_MORAL")]
    Moral,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_MYSTERIOUS")]
    Mysterious,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_RACONTEUR")]
    Raconteur,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_SARCASTIC")]
    Sarcastic,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_TENACIOUS")]
    Tenacious,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_VILLAINOUS")]
    Villainous,
    #[serde(rename = "EXAMPLE_DIALOG_STYLE_CUSTOM")]
    Custom,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Age bracket of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeStage {
    #[serde(rename = "LIFE_STAGE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "LIFE_STAGE_CHILDHOOD")]
    Childhood,
    #[serde(rename = "LIFE_STAGE_ADOLESCENCE")]
    Adolescence,
    #[serde(rename = "LIFE_STAGE_YOUNG_ADULTHOOD")]
    YoungAdulthood,
    #[serde(rename = "LIFE_STAGE_MIDDLE_ADULTHOOD")]
    MiddleAdulthood,
    #[serde(rename = "LIFE_STAGE_LATE_ADULTHOOD")]
    LateAdulthood,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Pronoun used for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pronoun {
    #[serde(rename = "PRONOUN_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PRONOUN_FEMALE")]
    Female,
    #[serde(rename = "PRONOUN_MALE")]
    Male,
    #[serde(rename = "PRONOUN_OTHER")]
    Other,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Content filtering level for one safety topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLevel {
    #[serde(rename = "SAFETY_LEVEL_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SAFETY_LEVEL_NO_CONTROL")]
    NoControl,
    #[serde(rename = "SAFETY_LEVEL_MILD_CONTROL")]
    MildControl,
    #[serde(rename = "SAFETY_LEVEL_STRICT_CONTROL")]
    StrictControl,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Text-to-speech engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TtsType {
    #[serde(rename = "TTS_TYPE_GOOGLE")]
    Google,
    #[serde(rename = "TTS_TYPE_INWORLD")]
    Inworld,
    #[serde(rename = "TTS_TYPE_ELEVEN_LABS")]
    ElevenLabs,
    #[serde(rename = "TTS_TYPE_INWORLD_V2")]
    InworldV2,
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

/// Parameters for listing characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCharactersRequest {
    /// Workspace id. Required.
    pub workspace_id: String,
    /// Detail level of each returned character.
    pub view: Option<CharacterView>,
    /// Paging and filtering.
    pub page: PageRequest,
}

/// One page of characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListCharactersResponse {
    pub characters: Vec<Character>,
    pub next_page_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions (simple API)
// ─────────────────────────────────────────────────────────────────────────────

/// Send text to a single character without opening a session first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimpleSendTextRequest {
    /// `workspaces/{workspace}/characters/{character}`. Required.
    pub character: String,
    /// Required.
    pub text: String,
    /// Continue an existing session.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    /// Globally unique id of the end user.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_user_id: String,
    /// Name the character addresses the user by.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_user_fullname: String,
}

/// Load a scene or character into a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSessionRequest {
    /// `workspaces/{workspace}/scenes/{scene}` or
    /// `workspaces/{workspace}/characters/{character}`. Required.
    pub name: String,
    /// End user taking part in the session.
    pub user: EndUserConfig,
}

/// End user of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndUserConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub given_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gender: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// Sent as a decimal string.
    #[serde(skip_serializing_if = "is_zero_i64", with = "string_i64")]
    pub age: i64,
}

/// Send text within an open session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendTextRequest {
    /// Session id, sent as a header. Required.
    #[serde(skip)]
    pub session_id: String,
    /// `workspaces/{w}/sessions/{s}/sessionCharacters/{c}`, part of the URL. Required.
    #[serde(skip)]
    pub session_character: String,
    /// Required.
    pub text: String,
}

/// Send a trigger within an open session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendTriggerRequest {
    /// Session id, sent as a header. Required.
    #[serde(skip)]
    pub session_id: String,
    /// `workspaces/{w}/sessions/{s}/sessionCharacters/{c}`, part of the URL. Required.
    #[serde(skip)]
    pub session_character: String,
    /// Required.
    pub trigger_event: TriggerEvent,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_user_id: String,
}

/// Custom event sent to or raised by a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerEvent {
    /// `workspaces/{workspace}/triggers/{event}`.
    pub trigger: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

/// String parameter of a trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// An opened session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// `workspaces/{workspace}/sessions/{session}`.
    pub name: String,
    /// Runtime instances of the loaded characters.
    pub session_characters: Vec<SessionCharacter>,
    /// Scene or character that was loaded.
    pub loaded_scene: String,
}

/// Runtime instance of a character within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionCharacter {
    /// `workspaces/{w}/sessions/{s}/sessionCharacters/{c}`.
    pub name: String,
    /// `workspaces/{workspace}/characters/{character}`.
    pub character: String,
    pub display_name: String,
    pub character_assets: CharacterAsset,
}

/// Avatar images of a session character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterAsset {
    pub avatar_img: String,
    pub avatar_img_original: String,
}

/// Reply of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interaction {
    /// `workspaces/{w}/sessions/{s}/interactions/{i}`.
    pub name: String,
    /// Replies and narrated actions, in order.
    pub text_list: Vec<String>,
    /// Emotion at the end of the interaction.
    pub emotion: Emotion,
    pub session_id: String,
    pub relationship_update: RelationshipUpdate,
    pub active_triggers: Vec<TriggerEvent>,
    pub custom_event: CustomEvent,
    pub parameters: HashMap<String, Value>,
}

/// Custom event raised during an interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomEvent {
    pub custom_event: String,
    pub parameters: Vec<Value>,
}

/// Emotion of a session character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emotion {
    pub behavior: SpaffCode,
    pub strength: Strength,
}

/// Behaviour code of an emotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaffCode {
    #[default]
    #[serde(rename = "SPAFF_CODE_UNSPECIFIED")]
    Unspecified,
    Neutral,
    Disgust,
    Contempt,
    Belligerence,
    Domineering,
    Criticism,
    Anger,
    Tension,
    TenseHumor,
    Defensiveness,
    Whining,
    Sadness,
    Stonewalling,
    Interest,
    Validation,
    Affection,
    Humor,
    Surprise,
    Joy,
    #[serde(other)]
    Unrecognized,
}

/// Strength of an emotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    #[default]
    #[serde(rename = "STRENGTH_UNSPECIFIED")]
    Unspecified,
    Weak,
    Strong,
    Normal,
    #[serde(other)]
    Unrecognized,
}

/// Relationship changes caused by the latest interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipUpdate {
    pub trust: i32,
    pub respect: i32,
    pub familiar: i32,
    pub flirtatious: i32,
    pub attraction: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scene_wire_names_and_omissions() {
        let scene = Scene {
            display_name: "Lobby".to_string(),
            characters: Some(vec![SceneCharacterReference {
                character: "workspaces/w/characters/c".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&scene).unwrap(),
            json!({
                "sceneTriggers": null,
                "displayName": "Lobby",
                "meta": null,
                "commonKnowledge": null,
                "timePeriod": "",
                "characters": [{"character": "workspaces/w/characters/c"}],
                "inworldTags": null,
                "defaultSceneAssets": {"sceneImg": "", "sceneImgOriginal": ""}
            })
        );
    }

    #[test]
    fn test_character_decodes_partial_body() {
        let character: Character = serde_json::from_value(json!({
            "name": "workspaces/w/characters/c",
            "defaultCharacterDescription": {
                "givenName": "Ada",
                "pronoun": "PRONOUN_FEMALE",
                "wikipediaUri": "https://en.wikipedia.org/wiki/Ada_Lovelace",
                "lifeStage": "LIFE_STAGE_LATE_ADULTHOOD"
            },
            "defaultCharacterAssets": {
                "voice": {"baseName": "Wise", "ttsType": "TTS_TYPE_INWORLD_V2", "ttsMetadata": {"voiceId": "v1"}},
                "avatarImg": "https://img/a.png"
            },
            "safetyConfig": {"violence": "SAFETY_LEVEL_MILD_CONTROL"},
            "cognitiveControl": "COGNITIVE_CONTROL_STRICT"
        }))
        .unwrap();

        let description = &character.default_character_description;
        assert_eq!(description.given_name, "Ada");
        assert_eq!(description.pronoun, Some(Pronoun::Female));
        assert_eq!(description.life_stage, Some(LifeStage::LateAdulthood));
        let voice = &character.default_character_assets.voice;
        assert_eq!(voice.tts_type, Some(TtsType::InworldV2));
        assert_eq!(voice.tts_metadata.as_ref().unwrap().voice_id, "v1");
        assert_eq!(character.safety_config["violence"], SafetyLevel::MildControl);
        assert_eq!(character.cognitive_control, Some(CognitiveControl::Strict));
    }

    #[test]
    fn test_character_optional_fields_skipped() {
        let value = serde_json::to_value(Character::default()).unwrap();
        let object = value.as_object().unwrap();

        for skipped in ["name", "emotionalFluidity", "safetyConfig", "cognitiveControl", "language", "fourthWall"] {
            assert!(!object.contains_key(skipped), "{skipped} should be omitted");
        }
        for present in ["defaultCharacterDescription", "socialRank", "yamlConfig", "sharePortalInfo","longTermCoherence"] {
            assert!(object.contains_key(present), "{present} should be sent");
        }
        assert_eq!(object["personalKnowledge"], Value::Null);
        assert_eq!(
            object["defaultCharacterDescription"]["wikipediaUri"],
            json!("")
        );
    }

    #[test]
    fn test_unknown_enum_values_decode() {
        let pronoun: Pronoun = serde_json::from_str(r#""PRONOUN_NEW_VALUE""#).unwrap();
        assert_eq!(pronoun, Pronoun::Unrecognized);

        let emotion: Emotion =
            serde_json::from_value(json!({"behavior": "TENSE_HUMOR", "strength": "SHOUTY"})).unwrap();
        assert_eq!(emotion.behavior, SpaffCode::TenseHumor);
        assert_eq!(emotion.strength, Strength::Unrecognized);
    }

    #[test]
    fn test_spaff_code_wire_values() {
        assert_eq!(
            serde_json::to_string(&SpaffCode::Unspecified).unwrap(),
            r#""SPAFF_CODE_UNSPECIFIED""#
        );
        assert_eq!(serde_json::to_string(&SpaffCode::Joy).unwrap(), r#""JOY""#);
        assert_eq!(
            serde_json::to_string(&Strength::Unspecified).unwrap(),
            r#""STRENGTH_UNSPECIFIED""#
        );
    }

    #[test]
    fn test_end_user_age_is_string() {
        let request = OpenSessionRequest {
            name: "workspaces/w/scenes/s".to_string(),
            user: EndUserConfig {
                given_name: "Sam".to_string(),
                age: 33,
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "workspaces/w/scenes/s", "user": {"givenName": "Sam", "age": "33"}})
        );

        let empty = serde_json::to_value(OpenSessionRequest::default()).unwrap();
        assert_eq!(empty, json!({"name": "", "user": {}}));

        let decoded: EndUserConfig = serde_json::from_value(json!({"age": "41"})).unwrap();
        assert_eq!(decoded.age, 41);
    }

    #[test]
    fn test_send_requests_keep_routing_fields_off_the_wire() {
        let request = SendTextRequest {
            session_id: "s".to_string(),
            session_character: "workspaces/w/sessions/s/sessionCharacters/c".to_string(),
            text: "hello".to_string(),
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"text": "hello"}));

        let trigger = SendTriggerRequest {
            session_id: "s".to_string(),
            session_character: "c".to_string(),
            trigger_event: TriggerEvent {
                trigger: "workspaces/w/triggers/wave".to_string(),
                parameters: vec![],
            },
            end_user_id: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&trigger).unwrap(),
            json!({"triggerEvent": {"trigger": "workspaces/w/triggers/wave"}})
        );
    }

    #[test]
    fn test_interaction_decodes() {
        let interaction: Interaction = serde_json::from_value(json!({
            "name": "workspaces/w/sessions/s/interactions/i",
            "textList": ["Hello there.", "*waves*"],
            "emotion": {"behavior": "JOY", "strength": "STRONG"},
            "sessionId": "s",
            "relationshipUpdate": {"trust": 2},
            "activeTriggers": [{"trigger": "workspaces/w/triggers/greet", "parameters": [{"name": "n", "value": "v"}]}],
            "customEvent": {"customEvent": "greeted", "parameters": []},
            "parameters": {"mood": "good"}
        }))
        .unwrap();

        assert_eq!(interaction.text_list.len(), 2);
        assert_eq!(interaction.emotion.behavior, SpaffCode::Joy);
        assert_eq!(interaction.relationship_update.trust, 2);
        assert_eq!(interaction.active_triggers[0].parameters[0].value, "v");
        assert_eq!(interaction.custom_event.custom_event, "greeted");
        assert_eq!(interaction.parameters["mood"], json!("good"));
    }

    #[test]
    fn test_list_response_page_token() {
        let page: ListCommonKnowledgeResponse = serde_json::from_value(json!({
            "commonKnowledge": [{"name": "workspaces/w/common-knowledge/k", "memoryRecords": ["a", "b"]}],
            "nextPageToken": "next"
        }))
        .unwrap();
        assert_eq!(page.common_knowledge[0].memory_records.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(page.next_page_token, "next");
    }
}
