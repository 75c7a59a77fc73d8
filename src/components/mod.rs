use yew::prelude::*;

/// An uncontrolled text input the orchestrator reads by `name` at submit time.
#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    /// Form field name, e.g. `"full_name"`.
    pub name: AttrValue,
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub required: bool,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub autofocus: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    // Required fields get a trailing star, as the server-rendered form does.
    let placeholder = if props.required {
        format!("{} *", props.placeholder)
    } else {
        props.placeholder.to_string()
    };
    html! {
        <input
            type={props.input_type.clone()}
            name={props.name.clone()}
            class="stripe-style-input"
            placeholder={placeholder}
            required={props.required}
            autofocus={props.autofocus}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct SubmitButtonProps {
    pub id: AttrValue,
    pub label: AttrValue,
}

#[function_component(SubmitButton)]
pub fn submit_button(props: &SubmitButtonProps) -> Html {
    html! {
        <button id={props.id.clone()} type="submit" class="btn btn-black rounded-0">
            <span class="font-weight-bold">{ props.label.to_string() }</span>
            <span class="icon"><i class="fas fa-lock"></i></span>
        </button>
    }
}

/// Container the card error messages are rendered into.
#[derive(Properties, PartialEq)]
pub struct ErrorRegionProps {
    pub id: AttrValue,
}

#[function_component(ErrorRegion)]
pub fn error_region(props: &ErrorRegionProps) -> Html {
    html! { <div id={props.id.clone()} class="mb-3 text-danger" role="alert"></div> }
}
