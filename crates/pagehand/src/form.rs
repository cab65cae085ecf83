//! Form inputs.
//!
//! A [`Form`] is a set of [`FormInput`]s keyed by alias. Each input knows how
//! to fill itself from a plain string value and how to verify that the page
//! shows an expected value. Inputs are resolved inside whatever
//! [`SearchContext`] the form is bound to: the page document or a section
//! root.
//!
//! | Input | `fill(value)` |
//! |---|---|
//! | [`TextInput`] | clear (unless disabled) and type |
//! | [`RadioInput`] | click unless already selected |
//! | [`CheckboxInput`] | `checked` / `unchecked`, clicks only on change |
//! | [`CheckableGroupInput`] | click the label whose text is `value` |
//! | [`MultiSelectInput`] | open, toggle the labelled item, close |
//! | [`DropdownItem`] | click the element whose text is `value` |
//! | [`SelectInput`] | choose the `<option>` whose text is `value` |
//! | [`DateInput`] | `name:dd/mm/yyyy` over three selects |
//! | [`Button`] | click |

use crate::driver::ElementHandle;
use crate::element::SearchContext;
use crate::locator::{By, Locator, Strategy};
use crate::result::{HarnessError, HarnessResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Value accepted by [`CheckboxInput`] for a selected box
pub const CHECKED: &str = "checked";

/// Value accepted by [`CheckboxInput`] for a cleared box
pub const UNCHECKED: &str = "unchecked";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Locator and display name shared by every input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    locator: Locator,
    alias: String,
}

impl Field {
    /// Field located by name, aliased by its locator value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            alias: value.clone(),
            locator: Locator::name(value),
        }
    }

    /// Declared locator
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Display name used in forms and error messages
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    fn mismatch(&self, expected: &str, observed: impl Into<String>) -> HarnessError {
        HarnessError::VerificationMismatch {
            alias: self.alias.clone(),
            expected: expected.to_string(),
            observed: observed.into(),
        }
    }

    fn invalid(&self, message: impl Into<String>) -> HarnessError {
        HarnessError::InvalidValue {
            alias: self.alias.clone(),
            message: message.into(),
        }
    }
}

/// A fillable, verifiable form control
pub trait FormInput: fmt::Debug + Send + Sync {
    /// Locator and alias
    fn field(&self) -> &Field;

    /// Put `value` into the control
    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()>;

    /// Check that the control shows `expected`.
    ///
    /// Compares the `value` attribute unless the input overrides it.
    fn verify(&self, ctx: &SearchContext, expected: &str) -> HarnessResult<()> {
        let field = self.field();
        let element = ctx.find_one(field.locator())?;
        let observed = ctx
            .driver()
            .attribute(&element, "value")?
            .unwrap_or_default();
        if observed == expected {
            Ok(())
        } else {
            Err(field.mismatch(expected, observed))
        }
    }

    /// Display name
    fn alias(&self) -> &str {
        self.field().alias()
    }

    /// Declared locator
    fn locator(&self) -> &Locator {
        self.field().locator()
    }
}

macro_rules! input_builders {
    ($($input:ident { $($extra:ident: $default:expr),* }),* $(,)?) => {
        $(
            impl $input {
                /// Input located by name
                #[must_use]
                pub fn new(value: impl Into<String>) -> Self {
                    Self {
                        field: Field::new(value),
                        $($extra: $default),*
                    }
                }

                /// Refer to the input by `alias` instead of its locator value
                #[must_use]
                pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
                    self.field.alias = alias.into();
                    self
                }

                /// Locate the input with `strategy` instead of by name
                #[must_use]
                pub fn by(mut self, strategy: Strategy) -> Self {
                    self.field.locator = Locator::new(strategy, self.field.locator.value());
                    self
                }
            }
        )*
    };
}

input_builders!(
    TextInput { clear: true },
    RadioInput {},
    CheckboxInput {},
    CheckableGroupInput { kind: GroupKind::Checkbox },
    MultiSelectInput {},
    DropdownItem {},
    SelectInput {},
    DateInput {},
    Button {},
);

/// Free text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    field: Field,
    clear: bool,
}

impl TextInput {
    /// Append to existing content instead of replacing it
    #[must_use]
    pub const fn without_clear(mut self) -> Self {
        self.clear = false;
        self
    }
}

impl FormInput for TextInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let element = ctx.find_one(self.field.locator())?;
        ctx.scroll_into_view(&element);
        if self.clear {
            ctx.driver().clear(&element)?;
        }
        tracing::debug!(alias = %self.field.alias, "typing into input");
        ctx.driver().send_keys(&element, value)
    }
}

/// A single radio button; the fill value is ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioInput {
    field: Field,
}

impl FormInput for RadioInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, _value: &str) -> HarnessResult<()> {
        let element = ctx.find_one(self.field.locator())?;
        ctx.scroll_into_view(&element);
        if ctx.driver().is_selected(&element)? {
            return Ok(());
        }
        ctx.driver().click(&element)
    }
}

/// A single checkbox driven by [`CHECKED`] / [`UNCHECKED`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxInput {
    field: Field,
}

impl FormInput for CheckboxInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let element = ctx.find_one(self.field.locator())?;
        ctx.scroll_into_view(&element);
        let selected = ctx.driver().is_selected(&element)?;
        if selected ^ (value == CHECKED) {
            ctx.driver().click(&element)?;
        }
        Ok(())
    }

    fn verify(&self, ctx: &SearchContext, expected: &str) -> HarnessResult<()> {
        let want = match expected {
            CHECKED => true,
            UNCHECKED => false,
            other => {
                return Err(self
                    .field
                    .invalid(format!("expected '{CHECKED}' or '{UNCHECKED}', got '{other}'")))
            }
        };
        let element = ctx.find_one(self.field.locator())?;
        let selected = ctx.driver().is_selected(&element)?;
        if selected == want {
            Ok(())
        } else {
            let observed = if selected { CHECKED } else { UNCHECKED };
            Err(self.field.mismatch(expected, observed))
        }
    }
}

/// Flavour of a checkable group. All kinds fill the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKind {
    /// Radio buttons sharing a name
    Radio,
    /// Independent checkboxes
    #[default]
    Checkbox,
    /// Checkboxes laid out as pairs
    CheckboxTuple,
    /// Checkboxes labelled with dates
    CheckboxDated,
}

/// A group of checkboxes or radios chosen by their label text.
///
/// The locator must match every member of the group. Each member is paired
/// with the `label[for=<member id>]` that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckableGroupInput {
    field: Field,
    kind: GroupKind,
}

impl CheckableGroupInput {
    /// Radio group
    #[must_use]
    pub fn radio_group(value: impl Into<String>) -> Self {
        Self::new(value).with_kind(GroupKind::Radio)
    }

    /// Checkbox group
    #[must_use]
    pub fn checkbox_group(value: impl Into<String>) -> Self {
        Self::new(value).with_kind(GroupKind::Checkbox)
    }

    /// Checkbox tuple group
    #[must_use]
    pub fn checkbox_tuple_group(value: impl Into<String>) -> Self {
        Self::new(value).with_kind(GroupKind::CheckboxTuple)
    }

    /// Dated checkbox group
    #[must_use]
    pub fn checkbox_dated_group(value: impl Into<String>) -> Self {
        Self::new(value).with_kind(GroupKind::CheckboxDated)
    }

    /// Set the group flavour
    #[must_use]
    pub const fn with_kind(mut self, kind: GroupKind) -> Self {
        self.kind = kind;
        self
    }

    /// Group flavour
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Every member paired with its label, in document order
    fn labelled_members(
        &self,
        ctx: &SearchContext,
    ) -> HarnessResult<Vec<(ElementHandle, ElementHandle)>> {
        let mut pairs = Vec::new();
        for member in ctx.find_all(self.field.locator())? {
            let Some(id) = ctx.driver().attribute(&member, "id")? else {
                tracing::debug!(alias = %self.field.alias, %member, "group member has no id");
                continue;
            };
            let label = ctx.find_one(&label_for(&id))?;
            pairs.push((member, label));
        }
        Ok(pairs)
    }
}

/// `label[for="..."]` selector for an element id, quoted so ids with `.`,
/// `:` or a leading digit stay a single attribute value
fn label_for(id: &str) -> Locator {
    let escaped = id.replace('\\', r"\\").replace('"', r#"\""#);
    Locator::css(format!(r#"label[for="{escaped}"]"#))
}

impl FormInput for CheckableGroupInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let driver = ctx.driver();
        for (member, label) in self.labelled_members(ctx)? {
            if driver.text(&label)? == value && !driver.is_selected(&member)? {
                ctx.scroll_into_view(&member);
                tracing::debug!(alias = %self.field.alias, label = value, "clicking group label");
                return driver.click(&label);
            }
        }
        Ok(())
    }

    fn verify(&self, ctx: &SearchContext, expected: &str) -> HarnessResult<()> {
        let driver = ctx.driver();
        let mut selected = Vec::new();
        for (member, label) in self.labelled_members(ctx)? {
            if driver.is_selected(&member)? {
                selected.push(driver.text(&label)?);
            }
        }
        if selected.iter().any(|text| text == expected) {
            Ok(())
        } else {
            Err(self.field.mismatch(expected, selected.join(", ")))
        }
    }
}

/// A custom dropdown holding several toggleable labelled items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectInput {
    field: Field,
}

impl FormInput for MultiSelectInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let driver = ctx.driver();
        let dropdown = ctx.find_one(self.field.locator())?;
        driver.click(&dropdown)?;
        let labels = driver.find_elements(&By::Css("label".to_string()), Some(&dropdown))?;
        for label in labels {
            if driver.text(&label)? == value {
                ctx.scroll_into_view(&label);
                driver.click(&label)?;
                break;
            }
        }
        driver.click(&dropdown)
    }
}

/// One entry of a custom single-choice dropdown, chosen by visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    field: Field,
}

impl FormInput for DropdownItem {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let _members = ctx.find_all(self.field.locator())?;
        let label = ctx.find_one(&Locator::text(value))?;
        ctx.scroll_into_view(&label);
        ctx.driver().click(&label)
    }
}

/// Native `<select>` chosen by the visible text of an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectInput {
    field: Field,
}

impl SelectInput {
    fn options(&self, ctx: &SearchContext) -> HarnessResult<Vec<ElementHandle>> {
        let select = ctx.find_one(self.field.locator())?;
        ctx.scroll_into_view(&select);
        ctx.within(select).find_all(&Locator::tag_name("option"))
    }
}

impl FormInput for SelectInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let driver = ctx.driver();
        for option in self.options(ctx)? {
            if driver.text(&option)? == value {
                if !driver.is_selected(&option)? {
                    driver.click(&option)?;
                }
                return Ok(());
            }
        }
        Err(HarnessError::ElementNotFound {
            locator: value.to_string(),
            strategy: Strategy::TextContent,
        })
    }

    fn verify(&self, ctx: &SearchContext, expected: &str) -> HarnessResult<()> {
        let driver = ctx.driver();
        let mut observed = String::new();
        for option in self.options(ctx)? {
            if driver.is_selected(&option)? {
                observed = driver.text(&option)?;
                break;
            }
        }
        if observed == expected {
            Ok(())
        } else {
            Err(self.field.mismatch(expected, observed))
        }
    }
}

/// Day / month / year parts of a date value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    /// Base name of the three selects
    pub name: String,
    /// Day without leading zeros
    pub day: String,
    /// Three-letter month name
    pub month: &'static str,
    /// Year as written
    pub year: String,
}

/// Three `<select>`s named `<name>-day`, `<name>-month` and `<name>-year`,
/// filled from a value of the form `name:dd/mm/yyyy`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInput {
    field: Field,
}

impl DateInput {
    /// Split `name:dd/mm/yyyy` into its select values
    pub fn parse(&self, value: &str) -> HarnessResult<DateParts> {
        let (name, date) = value
            .split_once(':')
            .ok_or_else(|| self.field.invalid(format!("expected name:dd/mm/yyyy, got '{value}'")))?;
        let mut parts = date.splitn(3, '/');
        let (Some(day), Some(month), Some(year)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(self.field.invalid(format!("expected dd/mm/yyyy, got '{date}'")));
        };
        if name.is_empty() || year.is_empty() {
            return Err(self.field.invalid(format!("incomplete date '{value}'")));
        }

        let day = day.trim_start_matches('0');
        if day.is_empty() || !day.chars().all(|c| c.is_ascii_digit()) {
            return Err(self.field.invalid(format!("bad day in '{value}'")));
        }
        let month = month
            .trim_start_matches('0')
            .parse::<usize>()
            .ok()
            .and_then(|m| MONTHS.get(m.checked_sub(1)?).copied())
            .ok_or_else(|| self.field.invalid(format!("bad month in '{value}'")))?;

        Ok(DateParts {
            name: name.to_string(),
            day: day.to_string(),
            month,
            year: year.to_string(),
        })
    }

    fn selects(&self, parts: &DateParts) -> [(SelectInput, String); 3] {
        let strategy = self.field.locator.strategy();
        let select = |suffix: &str| SelectInput::new(format!("{}-{suffix}", parts.name)).by(strategy);
        [
            (select("day"), parts.day.clone()),
            (select("month"), parts.month.to_string()),
            (select("year"), parts.year.clone()),
        ]
    }
}

impl FormInput for DateInput {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, value: &str) -> HarnessResult<()> {
        let parts = self.parse(value)?;
        for (select, part) in self.selects(&parts) {
            select.fill(ctx, &part)?;
        }
        Ok(())
    }

    fn verify(&self, ctx: &SearchContext, expected: &str) -> HarnessResult<()> {
        let parts = self.parse(expected)?;
        for (select, part) in self.selects(&parts) {
            select.verify(ctx, &part)?;
        }
        Ok(())
    }
}

/// A button inside a form; filling clicks it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    field: Field,
}

impl FormInput for Button {
    fn field(&self) -> &Field {
        &self.field
    }

    fn fill(&self, ctx: &SearchContext, _value: &str) -> HarnessResult<()> {
        let element = ctx.find_one(self.field.locator())?;
        tracing::debug!(alias = %self.field.alias, "clicking button");
        ctx.driver().click(&element)
    }

    fn verify(&self, _ctx: &SearchContext, _expected: &str) -> HarnessResult<()> {
        Ok(())
    }
}

/// A set of inputs keyed by alias
#[derive(Debug, Clone, Default)]
pub struct Form {
    inputs: BTreeMap<String, Arc<dyn FormInput>>,
}

impl Form {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form, rejecting repeated aliases
    pub fn from_inputs<I>(inputs: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn FormInput>>,
    {
        let mut form = Self::new();
        for input in inputs {
            form.insert(input)?;
        }
        Ok(form)
    }

    /// Add an input, rejecting a repeated alias
    pub fn with(mut self, input: impl FormInput + 'static) -> HarnessResult<Self> {
        self.insert(Arc::new(input))?;
        Ok(self)
    }

    fn insert(&mut self, input: Arc<dyn FormInput>) -> HarnessResult<()> {
        let alias = input.alias().to_string();
        if self.inputs.contains_key(&alias) {
            return Err(HarnessError::DuplicateAlias { alias });
        }
        let _ = self.inputs.insert(alias, input);
        Ok(())
    }

    /// Input registered under `alias`
    pub fn input(&self, alias: &str) -> HarnessResult<&dyn FormInput> {
        self.inputs
            .get(alias)
            .map(AsRef::as_ref)
            .ok_or_else(|| HarnessError::unknown_alias(alias))
    }

    /// Registered aliases, sorted
    #[must_use]
    pub fn aliases(&self) -> Vec<&str> {
        self.inputs.keys().map(String::as_str).collect()
    }

    /// Number of inputs
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when the form has no inputs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Bind the form to a search context
    #[must_use]
    pub fn bind(&self, ctx: SearchContext) -> BoundForm<'_> {
        BoundForm { form: self, ctx }
    }
}

/// A form bound to the page or section it lives in
#[derive(Debug)]
pub struct BoundForm<'a> {
    form: &'a Form,
    ctx: SearchContext,
}

impl<'a> BoundForm<'a> {
    /// Fill the input registered under `alias`
    pub fn fill(&self, alias: &str, value: &str) -> HarnessResult<()> {
        tracing::debug!(alias, "filling form input");
        self.form.input(alias)?.fill(&self.ctx, value)
    }

    /// Verify the input registered under `alias`
    pub fn verify(&self, alias: &str, expected: &str) -> HarnessResult<()> {
        self.form.input(alias)?.verify(&self.ctx, expected)
    }

    /// Fill several inputs in order
    pub fn fill_all(&self, values: &[(&str, &str)]) -> HarnessResult<()> {
        for (alias, value) in values {
            self.fill(alias, value)?;
        }
        Ok(())
    }

    /// Click a button input
    pub fn press(&self, alias: &str) -> HarnessResult<()> {
        self.fill(alias, "")
    }

    /// Input registered under `alias`
    pub fn input(&self, alias: &str) -> HarnessResult<&'a dyn FormInput> {
        self.form.input(alias)
    }

    /// Search context the inputs resolve in
    #[must_use]
    pub const fn context(&self) -> &SearchContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Action, MockDriver, Node};
    use crate::wait::WaitOptions;

    fn fast() -> WaitOptions {
        WaitOptions::new().with_timeout(100).with_poll_interval(5)
    }

    fn setup() -> (Arc<MockDriver>, SearchContext) {
        let driver = Arc::new(MockDriver::new());
        let ctx = SearchContext::document(driver.clone(), fast());
        (driver, ctx)
    }

    fn checkbox(driver: &MockDriver, name: &str, selected: bool) -> ElementHandle {
        driver.append(
            None,
            Node::new("input")
                .attr("type", "checkbox")
                .attr("name", name)
                .selected(selected),
        )
    }

    fn select(driver: &MockDriver, name: &str, options: &[&str]) -> ElementHandle {
        let select = driver.append(None, Node::new("select").attr("name", name));
        for option in options {
            let _ = driver.append(Some(&select), Node::new("option").text(*option));
        }
        select
    }

    mod field_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let input = TextInput::new("email");
            assert_eq!(input.alias(), "email");
            assert_eq!(input.locator(), &Locator::name("email"));
        }

        #[test]
        fn test_alias_and_strategy() {
            let input = Button::new("#submit").with_alias("submit").by(Strategy::Css);
            assert_eq!(input.alias(), "submit");
            assert_eq!(input.locator(), &Locator::css("#submit"));
        }

        #[test]
        fn test_label_for_quotes_id() {
            assert_eq!(label_for("opt.1").value(), r#"label[for="opt.1"]"#);
            assert_eq!(label_for("1:a").value(), r#"label[for="1:a"]"#);
            assert_eq!(label_for(r#"say"hi"#).value(), r#"label[for="say\"hi"]"#);
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_fill_replaces_value() {
            let (driver, ctx) = setup();
            let input = driver.append(None, Node::new("input").attr("name", "q").attr("value", "old"));
            TextInput::new("q").fill(&ctx, "rust").unwrap();
            assert_eq!(driver.value_of(&input).as_deref(), Some("rust"));
            TextInput::new("q").verify(&ctx, "rust").unwrap();
        }

        #[test]
        fn test_fill_without_clear_appends() {
            let (driver, ctx) = setup();
            let input = driver.append(None, Node::new("input").attr("name", "q").attr("value", "a"));
            TextInput::new("q").without_clear().fill(&ctx, "b").unwrap();
            assert_eq!(driver.value_of(&input).as_deref(), Some("ab"));
        }

        #[test]
        fn test_verify_mismatch() {
            let (driver, ctx) = setup();
            let _input = driver.append(None, Node::new("input").attr("name", "q").attr("value", "x"));
            let err = TextInput::new("q").with_alias("query").verify(&ctx, "y").unwrap_err();
            match err {
                HarnessError::VerificationMismatch { alias, expected, observed } => {
                    assert_eq!(alias, "query");
                    assert_eq!(expected, "y");
                    assert_eq!(observed, "x");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    mod checkable_tests {
        use super::*;

        #[test]
        fn test_checkbox_fill_is_idempotent() {
            let (driver, ctx) = setup();
            let tos = checkbox(&driver, "tos", false);
            let input = CheckboxInput::new("tos");
            input.fill(&ctx, CHECKED).unwrap();
            input.fill(&ctx, CHECKED).unwrap();
            assert_eq!(driver.clicks_on(&tos), 1);
            assert!(driver.selected_of(&tos));
        }

        #[test]
        fn test_checkbox_uncheck() {
            let (driver, ctx) = setup();
            let tos = checkbox(&driver, "tos", true);
            CheckboxInput::new("tos").fill(&ctx, UNCHECKED).unwrap();
            assert!(!driver.selected_of(&tos));
        }

        #[test]
        fn test_checkbox_verify() {
            let (driver, ctx) = setup();
            let _tos = checkbox(&driver, "tos", true);
            let input = CheckboxInput::new("tos");
            input.verify(&ctx, CHECKED).unwrap();
            assert!(matches!(
                input.verify(&ctx, UNCHECKED),
                Err(HarnessError::VerificationMismatch { observed, .. }) if observed == CHECKED
            ));
            assert!(matches!(
                input.verify(&ctx, "maybe"),
                Err(HarnessError::InvalidValue { .. })
            ));
        }

        #[test]
        fn test_selected_radio_is_not_clicked() {
            let (driver, ctx) = setup();
            let radio = driver.append(
                None,
                Node::new("input").attr("type", "radio").attr("name", "plan").selected(true),
            );
            RadioInput::new("plan").fill(&ctx, "").unwrap();
            assert_eq!(driver.clicks_on(&radio), 0);
        }

        #[test]
        fn test_group_clicks_matching_label() {
            let (driver, ctx) = setup();
            let red = driver.append(
                None,
                Node::new("input").attr("type", "radio").attr("name", "colour").attr("id", "c.red"),
            );
            let red_label = driver.append(None, Node::new("label").attr("for", "c.red").text("Red"));
            let blue = driver.append(
                None,
                Node::new("input").attr("type", "radio").attr("name", "colour").attr("id", "c.blue"),
            );
            let blue_label = driver.append(None, Node::new("label").attr("for", "c.blue").text("Blue"));

            let group = CheckableGroupInput::radio_group("colour");
            group.fill(&ctx, "Blue").unwrap();
            assert_eq!(driver.clicks_on(&blue_label), 1);
            assert_eq!(driver.clicks_on(&red_label), 0);
            assert!(driver.selected_of(&blue));
            assert!(!driver.selected_of(&red));

            group.verify(&ctx, "Blue").unwrap();
            assert!(matches!(
                group.verify(&ctx, "Red"),
                Err(HarnessError::VerificationMismatch { observed, .. }) if observed == "Blue"
            ));
        }

        #[test]
        fn test_group_member_ids_with_colons_and_digits() {
            let (driver, ctx) = setup();
            let first = driver.append(
                None,
                Node::new("input").attr("type", "checkbox").attr("name", "size").attr("id", "2:small"),
            );
            let _label = driver.append(None, Node::new("label").attr("for", "2:small").text("Small"));
            CheckableGroupInput::checkbox_group("size").fill(&ctx, "Small").unwrap();
            assert!(driver.selected_of(&first));
        }

        #[test]
        fn test_group_skips_selected_member() {
            let (driver, ctx) = setup();
            let _a = driver.append(
                None,
                Node::new("input")
                    .attr("type", "checkbox")
                    .attr("name", "days")
                    .attr("id", "mon")
                    .selected(true),
            );
            let label = driver.append(None, Node::new("label").attr("for", "mon").text("Monday"));
            CheckableGroupInput::checkbox_dated_group("days").fill(&ctx, "Monday").unwrap();
            assert_eq!(driver.clicks_on(&label), 0);
        }
    }

    mod select_tests {
        use super::*;

        #[test]
        fn test_select_by_visible_text() {
            let (driver, ctx) = setup();
            let _country = select(&driver, "country", &["France", "Spain"]);
            let input = SelectInput::new("country");
            input.fill(&ctx, "Spain").unwrap();
            input.verify(&ctx, "Spain").unwrap();
            assert!(matches!(
                input.verify(&ctx, "France"),
                Err(HarnessError::VerificationMismatch { observed, .. }) if observed == "Spain"
            ));
        }

        #[test]
        fn test_select_missing_option() {
            let (driver, ctx) = setup();
            let _country = select(&driver, "country", &["France"]);
            assert!(matches!(
                SelectInput::new("country").fill(&ctx, "Peru"),
                Err(HarnessError::ElementNotFound { strategy: Strategy::TextContent, .. })
            ));
        }

        #[test]
        fn test_multi_select_opens_toggles_closes() {
            let (driver, ctx) = setup();
            let dropdown = driver.append(None, Node::new("div").attr("name", "tags"));
            let _a = driver.append(Some(&dropdown), Node::new("label").text("Alpha"));
            let b = driver.append(Some(&dropdown), Node::new("label").text("Beta"));

            MultiSelectInput::new("tags").fill(&ctx, "Beta").unwrap();
            assert_eq!(
                driver.interactions(),
                vec![
                    Action::Click(dropdown.id().to_string()),
                    Action::Click(b.id().to_string()),
                    Action::Click(dropdown.id().to_string()),
                ]
            );
        }

        #[test]
        fn test_dropdown_item_clicks_text() {
            let (driver, ctx) = setup();
            let _item = driver.append(None, Node::new("li").attr("name", "size"));
            let large = driver.append(None, Node::new("span").text("Large"));
            DropdownItem::new("size").fill(&ctx, "Large").unwrap();
            assert_eq!(driver.clicks_on(&large), 1);
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_parse() {
            let parts = DateInput::new("dob").parse("dob:05/03/1990").unwrap();
            assert_eq!(parts.name, "dob");
            assert_eq!(parts.day, "5");
            assert_eq!(parts.month, "Mar");
            assert_eq!(parts.year, "1990");
        }

        #[test]
        fn test_parse_rejects_malformed() {
            let input = DateInput::new("dob");
            for bad in ["05/03/1990", "dob:05/1990", "dob:05/13/1990", "dob:00/03/1990", "dob:5/0/1990"] {
                assert!(
                    matches!(input.parse(bad), Err(HarnessError::InvalidValue { .. })),
                    "{bad} should be rejected"
                );
            }
        }

        #[test]
        fn test_fill_three_selects() {
            let (driver, ctx) = setup();
            let _day = select(&driver, "dob-day", &["4", "5", "6"]);
            let _month = select(&driver, "dob-month", &["Feb", "Mar"]);
            let _year = select(&driver, "dob-year", &["1989", "1990"]);

            let input = DateInput::new("dob");
            input.fill(&ctx, "dob:05/03/1990").unwrap();
            SelectInput::new("dob-day").verify(&ctx, "5").unwrap();
            SelectInput::new("dob-month").verify(&ctx, "Mar").unwrap();
            SelectInput::new("dob-year").verify(&ctx, "1990").unwrap();
            input.verify(&ctx, "dob:5/3/1990").unwrap();
        }
    }

    mod form_tests {
        use super::*;

        fn login() -> Form {
            Form::new()
                .with(TextInput::new("email"))
                .and_then(|f| f.with(Button::new("submit")))
                .unwrap()
        }

        #[test]
        fn test_duplicate_alias_rejected() {
            let result = Form::new()
                .with(TextInput::new("email"))
                .and_then(|f| f.with(TextInput::new("mail").with_alias("email")));
            assert!(matches!(
                result,
                Err(HarnessError::DuplicateAlias { alias }) if alias == "email"
            ));
        }

        #[test]
        fn test_from_inputs() {
            let inputs: Vec<Arc<dyn FormInput>> =
                vec![Arc::new(TextInput::new("a")), Arc::new(Button::new("b"))];
            let form = Form::from_inputs(inputs).unwrap();
            assert_eq!(form.aliases(), vec!["a", "b"]);
            assert_eq!(form.len(), 2);
        }

        #[test]
        fn test_unknown_alias() {
            let (_driver, ctx) = setup();
            let form = login();
            let bound = form.bind(ctx);
            assert!(matches!(
                bound.fill("password", "x"),
                Err(HarnessError::UnknownAlias { alias }) if alias == "password"
            ));
            assert!(bound.input("nope").is_err());
        }

        #[test]
        fn test_type_then_submit() {
            let (driver, ctx) = setup();
            let email = driver.append(None, Node::new("input").attr("name", "email"));
            let submit = driver.append(None, Node::new("button").attr("name", "submit"));

            let form = login();
            let bound = form.bind(ctx);
            bound.fill("email", "a@b.com").unwrap();
            bound.press("submit").unwrap();

            let typed_and_clicked: Vec<Action> = driver
                .interactions()
                .into_iter()
                .filter(|a| !matches!(a, Action::Clear(_)))
                .collect();
            assert_eq!(
                typed_and_clicked,
                vec![
                    Action::SendKeys {
                        element: email.id().to_string(),
                        text: "a@b.com".to_string(),
                    },
                    Action::Click(submit.id().to_string()),
                ]
            );
            bound.verify("submit", "anything").unwrap();
        }
    }
}
