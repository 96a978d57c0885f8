use serde::Serialize;

use projector_core::domain::project::Project;

pub const CREATE_PROJECT_CALLBACK_ID: &str = "create_project_modal";
pub const NAME_BLOCK_ID: &str = "name_block";
pub const NAME_ACTION_ID: &str = "name";
pub const DESCRIPTION_BLOCK_ID: &str = "desc_block";
pub const DESCRIPTION_ACTION_ID: &str = "description";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput {
        action_id: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Input {
        block_id: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
        label: TextObject,
        element: InputElement,
    },
}

/// A `views.open` modal definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModalView {
    #[serde(rename = "type")]
    kind: &'static str,
    pub callback_id: String,
    pub title: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<TextObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<TextObject>,
    pub blocks: Vec<Block>,
}

pub struct ModalBuilder {
    callback_id: String,
    title: String,
    submit: Option<String>,
    close: Option<String>,
    blocks: Vec<Block>,
}

impl ModalBuilder {
    pub fn new(callback_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            callback_id: callback_id.into(),
            title: title.into(),
            submit: None,
            close: None,
            blocks: Vec::new(),
        }
    }

    pub fn submit(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(label.into());
        self
    }

    pub fn close(mut self, label: impl Into<String>) -> Self {
        self.close = Some(label.into());
        self
    }

    pub fn input<F>(mut self, block_id: impl Into<String>, label: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut InputBuilder),
    {
        let mut builder = InputBuilder::default();
        build(&mut builder);
        let (optional, element) = builder.build();
        self.blocks.push(Block::Input {
            block_id: block_id.into(),
            optional,
            label: TextObject::plain(label),
            element,
        });
        self
    }

    pub fn build(self) -> ModalView {
        ModalView {
            kind: "modal",
            callback_id: self.callback_id,
            title: TextObject::plain(self.title),
            submit: self.submit.map(TextObject::plain),
            close: self.close.map(TextObject::plain),
            blocks: self.blocks,
        }
    }
}

#[derive(Default)]
pub struct InputBuilder {
    action_id: String,
    multiline: bool,
    optional: bool,
    placeholder: Option<String>,
}

impl InputBuilder {
    pub fn action_id(&mut self, action_id: impl Into<String>) -> &mut Self {
        self.action_id = action_id.into();
        self
    }

    pub fn placeholder(&mut self, text: impl Into<String>) -> &mut Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn multiline(&mut self) -> &mut Self {
        self.multiline = true;
        self
    }

    pub fn optional(&mut self) -> &mut Self {
        self.optional = true;
        self
    }

    fn build(self) -> (bool, InputElement) {
        let element = InputElement::PlainTextInput {
            action_id: self.action_id,
            multiline: self.multiline,
            placeholder: self.placeholder.map(TextObject::plain),
        };
        (self.optional, element)
    }
}

pub fn create_project_modal() -> ModalView {
    ModalBuilder::new(CREATE_PROJECT_CALLBACK_ID, "Create project")
        .submit("Create")
        .close("Cancel")
        .input(NAME_BLOCK_ID, "Project name", |input| {
            input.action_id(NAME_ACTION_ID).placeholder("e.g., Huracán Stats MVP");
        })
        .input(DESCRIPTION_BLOCK_ID, "Description", |input| {
            input
                .action_id(DESCRIPTION_ACTION_ID)
                .optional()
                .multiline()
                .placeholder("What is this project about?");
        })
        .build()
}

/// Confirmation posted to the creator and the projects channel. The
/// description line is left out when there is no description.
pub fn project_created_text(project: &Project) -> String {
    let mut lines = vec![
        "📁 *Project created*".to_string(),
        format!("*{}* — {}", project.id, project.name),
    ];
    if let Some(description) = project.description() {
        lines.push(format!("_{description}_"));
    }
    if !project.created_by.is_empty() {
        lines.push(format!("Created by <@{}>", project.created_by));
    }

    lines.join("\n")
}
