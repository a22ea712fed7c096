// ============================================================================
// RESOURCE - how each entity is listed and edited
// ============================================================================
// Tables and drawers are generic over `Resource`; the impls below only
// describe columns, cells and form fields.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::models::{Advertisement, Brand, BrandMember, Campaign, ChangeCreatorRequest, Location, Look, User};
use crate::utils::format::{format_money, format_optional_date};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

const fn column(key: &'static str, label: &'static str) -> Column {
    Column { key, label }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    /// Left out of the payload when blank
    Password,
    Number,
    Date,
    TextArea,
    File,
    Select(&'static [(&'static str, &'static str)]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// JSON key in the request body
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Field {
    Field { name, label, kind, required }
}

pub const ROLE_OPTIONS: &[(&str, &str)] = &[
    ("admin", "Admin"),
    ("creator", "Creator"),
    ("shopper", "Shopper"),
    ("brand", "Brand"),
];

pub const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("active", "Active"),
    ("paused", "Paused"),
    ("ended", "Ended"),
];

pub trait Resource: Clone + Serialize + DeserializeOwned + 'static {
    /// Singular, for drawer titles and toasts
    const LABEL: &'static str;
    const COLUMNS: &'static [Column];
    const FIELDS: &'static [Field];

    fn id(&self) -> Option<&str>;

    /// Name shown in confirmation prompts
    fn title(&self) -> String;

    fn cell(&self, key: &str) -> String;

    /// Thumbnail for the first column
    fn image(&self) -> Option<&str> {
        None
    }

    /// Body sent on save
    fn payload(form: &FormState) -> Value {
        form.payload(Self::FIELDS)
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Resource for User {
    const LABEL: &'static str = "User";
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("email", "Email"),
        column("role", "Role"),
        column("createdAt", "Joined"),
    ];
    const FIELDS: &'static [Field] = &[
        field("firstName", "First name", FieldKind::Text, true),
        field("lastName", "Last name", FieldKind::Text, true),
        field("email", "Email", FieldKind::Email, true),
        field("role", "Role", FieldKind::Select(ROLE_OPTIONS), true),
        field("phone", "Phone", FieldKind::Text, false),
        field("password", "Password", FieldKind::Password, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        self.full_name()
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.full_name(),
            "email" => text(&self.email),
            "role" => self.role.map(|role| role.label().to_string()).unwrap_or_default(),
            "createdAt" => format_optional_date(self.created_at.as_deref()),
            _ => String::new(),
        }
    }

    fn image(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

impl Resource for Brand {
    const LABEL: &'static str = "Brand";
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("website", "Website"),
        column("createdAt", "Created"),
    ];
    const FIELDS: &'static [Field] = &[
        field("name", "Name", FieldKind::Text, true),
        field("website", "Website", FieldKind::Text, false),
        field("logoUrl", "Logo URL", FieldKind::Text, false),
        field("description", "Description", FieldKind::TextArea, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        text(&self.name)
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => text(&self.name),
            "website" => text(&self.website),
            "createdAt" => format_optional_date(self.created_at.as_deref()),
            _ => String::new(),
        }
    }

    fn image(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }
}

impl Resource for BrandMember {
    const LABEL: &'static str = "Member";
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("email", "Email"),
        column("memberRole", "Role"),
    ];
    const FIELDS: &'static [Field] = &[
        field("firstName", "First name", FieldKind::Text, true),
        field("lastName", "Last name", FieldKind::Text, true),
        field("email", "Email", FieldKind::Email, true),
        field("memberRole", "Role", FieldKind::Text, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        let name = format!("{} {}", text(&self.first_name), text(&self.last_name));
        name.trim().to_string()
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.title(),
            "email" => text(&self.email),
            "memberRole" => text(&self.member_role),
            _ => String::new(),
        }
    }
}

impl Resource for Campaign {
    const LABEL: &'static str = "Campaign";
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("status", "Status"),
        column("startDate", "Starts"),
        column("endDate", "Ends"),
        column("budget", "Budget"),
    ];
    const FIELDS: &'static [Field] = &[
        field("name", "Name", FieldKind::Text, true),
        field("status", "Status", FieldKind::Select(STATUS_OPTIONS), true),
        field("startDate", "Start date", FieldKind::Date, true),
        field("endDate", "End date", FieldKind::Date, false),
        field("budget", "Budget (cents)", FieldKind::Number, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        text(&self.name)
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => text(&self.name),
            "status" => text(&self.status),
            "startDate" => format_optional_date(self.start_date.as_deref()),
            "endDate" => format_optional_date(self.end_date.as_deref()),
            "budget" => format_money(self.budget),
            _ => String::new(),
        }
    }
}

impl Resource for Advertisement {
    const LABEL: &'static str = "Advertisement";
    const COLUMNS: &'static [Column] = &[
        column("title", "Title"),
        column("status", "Status"),
        column("linkUrl", "Link"),
    ];
    const FIELDS: &'static [Field] = &[
        field("title", "Title", FieldKind::Text, true),
        field("campaignId", "Campaign ID", FieldKind::Text, true),
        field("status", "Status", FieldKind::Select(STATUS_OPTIONS), false),
        field("linkUrl", "Link URL", FieldKind::Text, false),
        field("image", "Image", FieldKind::File, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        text(&self.title)
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "title" => text(&self.title),
            "status" => text(&self.status),
            "linkUrl" => text(&self.link_url),
            _ => String::new(),
        }
    }

    fn image(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl Resource for Location {
    const LABEL: &'static str = "Location";
    const COLUMNS: &'static [Column] = &[
        column("name", "Name"),
        column("address", "Address"),
        column("city", "City"),
        column("country", "Country"),
    ];
    const FIELDS: &'static [Field] = &[
        field("name", "Name", FieldKind::Text, true),
        field("address", "Address", FieldKind::Text, true),
        field("city", "City", FieldKind::Text, true),
        field("country", "Country", FieldKind::Text, true),
        field("latitude", "Latitude", FieldKind::Number, false),
        field("longitude", "Longitude", FieldKind::Number, false),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        text(&self.name)
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => text(&self.name),
            "address" => text(&self.address),
            "city" => text(&self.city),
            "country" => text(&self.country),
            _ => String::new(),
        }
    }
}

impl Resource for Look {
    const LABEL: &'static str = "Look";
    const COLUMNS: &'static [Column] = &[
        column("title", "Title"),
        column("creator", "Creator"),
        column("products", "Products"),
        column("createdAt", "Created"),
    ];
    // The only editable attribute of a look is its creator
    const FIELDS: &'static [Field] = &[field("creatorId", "Creator ID", FieldKind::Text, true)];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        text(&self.title)
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "title" => text(&self.title),
            "creator" => self.creator_name.clone().or_else(|| self.creator_id.clone()).unwrap_or_default(),
            "products" => self.products.len().to_string(),
            "createdAt" => format_optional_date(self.created_at.as_deref()),
            _ => String::new(),
        }
    }

    fn image(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    fn payload(form: &FormState) -> Value {
        let request = ChangeCreatorRequest {
            creator_id: form.text("creatorId").trim().to_string(),
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }
}

/// Editing buffer of a drawer: the record as a JSON object plus any
/// picked files. Fields the form does not show are carried through untouched.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    values: Map<String, Value>,
    files: Vec<(String, web_sys::File)>,
}

impl FormState {
    pub fn from_record<R: Serialize>(record: &R) -> Self {
        let values = match serde_json::to_value(record) {
            Ok(Value::Object(values)) => values,
            _ => Map::new(),
        };
        Self { values, files: Vec::new() }
    }

    /// Fill keys the form does not have yet
    pub fn merge(&mut self, defaults: &Map<String, Value>) {
        for (key, value) in defaults {
            self.values.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Text for an input: strings as-is, numbers printed, null/missing empty
    pub fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Number(value)) => value.to_string(),
            Some(Value::Bool(value)) => value.to_string(),
            _ => String::new(),
        }
    }

    /// Store user input, converting number fields. Unparseable numbers are
    /// kept as text so the server can reject them with its own message.
    pub fn set(&mut self, field: &Field, raw: &str) {
        let value = match field.kind {
            FieldKind::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Value::Null
                } else if let Ok(int) = trimmed.parse::<i64>() {
                    Value::Number(int.into())
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or_else(|| Value::String(trimmed.to_string()))
                }
            }
            _ => Value::String(raw.to_string()),
        };
        self.values.insert(field.name.to_string(), value);
    }

    pub fn set_file(&mut self, name: &str, file: web_sys::File) {
        self.files.retain(|(existing, _)| existing != name);
        self.files.push((name.to_string(), file));
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|(existing, _)| existing == name)
    }

    /// Labels of required fields that are still empty
    pub fn missing(&self, fields: &[Field]) -> Vec<&'static str> {
        fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| match field.kind {
                FieldKind::File => !self.has_file(field.name),
                _ => self.text(field.name).trim().is_empty(),
            })
            .map(|field| field.label)
            .collect()
    }

    /// Request body; blank password fields are dropped
    pub fn payload(&self, fields: &[Field]) -> Value {
        let mut values = self.values.clone();
        for field in fields {
            if field.kind == FieldKind::Password && self.text(field.name).is_empty() {
                values.remove(field.name);
            }
        }
        Value::Object(values)
    }

    pub fn files(&self) -> Vec<(String, web_sys::File)> {
        self.files.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        serde_json::from_value(json!({
            "_id": 12,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "role": "creator",
            "createdAt": "2024-03-05T10:00:00Z",
            "loyaltyTier": "gold"
        }))
        .unwrap()
    }

    #[test]
    fn cells_render_display_text() {
        let user = user();
        assert_eq!(Resource::id(&user), Some("12"));
        assert_eq!(user.cell("name"), "Ada Lovelace");
        assert_eq!(user.cell("role"), "Creator");
        assert_eq!(user.cell("createdAt"), "Mar 5, 2024");
        assert_eq!(user.cell("unknown"), "");
    }

    #[test]
    fn every_column_has_a_cell() {
        let campaign: Campaign = serde_json::from_value(json!({
            "id": "c1", "name": "Spring", "status": "active",
            "startDate": "2024-04-01", "budget": 150000
        }))
        .unwrap();
        for column in Campaign::COLUMNS {
            if column.key != "endDate" {
                assert!(!campaign.cell(column.key).is_empty(), "{}", column.key);
            }
        }
    }

    #[test]
    fn form_keeps_unmodelled_fields() {
        let mut form = FormState::from_record(&user());
        form.set(&User::FIELDS[0], "Augusta");
        let payload = form.payload(User::FIELDS);
        assert_eq!(payload["firstName"], "Augusta");
        assert_eq!(payload["loyaltyTier"], "gold");
        assert!(payload.get("password").is_none());
    }

    #[test]
    fn number_fields_are_converted() {
        let mut form = FormState::default();
        let budget = Campaign::FIELDS[4];
        form.set(&budget, " 2500 ");
        assert_eq!(form.payload(&[])["budget"], json!(2500));
        form.set(&budget, "12.5");
        assert_eq!(form.payload(&[])["budget"], json!(12.5));
        form.set(&budget, "");
        assert_eq!(form.payload(&[])["budget"], Value::Null);
        form.set(&budget, "lots");
        assert_eq!(form.payload(&[])["budget"], "lots");
    }

    #[test]
    fn missing_lists_blank_required_fields() {
        let mut form = FormState::default();
        assert_eq!(form.missing(Brand::FIELDS), vec!["Name"]);
        form.set(&Brand::FIELDS[0], "   ");
        assert_eq!(form.missing(Brand::FIELDS), vec!["Name"]);
        form.set(&Brand::FIELDS[0], "Acme");
        assert!(form.missing(Brand::FIELDS).is_empty());
    }

    #[test]
    fn look_payload_only_carries_the_creator() {
        let look: Look = serde_json::from_value(json!({"id": "l1", "title": "Summer", "creatorId": 4})).unwrap();
        let mut form = FormState::from_record(&look);
        assert_eq!(form.text("creatorId"), "4");
        form.set(&Look::FIELDS[0], " 9 ");
        assert_eq!(Look::payload(&form), json!({"creatorId": "9"}));
    }

    #[test]
    fn password_is_sent_only_when_typed() {
        let mut form = FormState::from_record(&user());
        let password = User::FIELDS[5];
        form.set(&password, "s3cret");
        assert_eq!(form.payload(User::FIELDS)["password"], "s3cret");
    }
}
