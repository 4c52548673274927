//! Invocation adapter for short-lived, stateless functions.
//!
//! Normalizes heterogeneous trigger payloads into a uniform call context,
//! runs one logic handler exactly once per invocation, and translates the
//! outcome into a transport-appropriate response. The builders below compose
//! a body preprocessor, a response shaper and an error normalizer around the
//! supplied logic.

pub mod envelope;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod preprocess;
pub mod recover;
pub mod respond;
pub mod router;

use std::collections::HashMap;

pub use envelope::ResponseEnvelope;
pub use error::{Fault, HttpError};
pub use event::{CallContext, Event};
pub use pipeline::{LogicFn, Pipeline, Reply, logic};
pub use preprocess::Preprocessor;
pub use recover::Recoverer;
pub use respond::{ApiOptions, ErrorPreHandler, Responder};
pub use router::methods;

/// JSON body decoding with API response/error shaping.
pub fn api(logic: LogicFn) -> Pipeline {
    api_with(logic, ApiOptions::default())
}

pub fn api_with(logic: LogicFn, options: ApiOptions) -> Pipeline {
    build_api(Preprocessor::JsonBody, logic, options)
}

/// API shaping without any body transformation.
pub fn api_raw(logic: LogicFn) -> Pipeline {
    api_raw_with(logic, ApiOptions::default())
}

pub fn api_raw_with(logic: LogicFn, options: ApiOptions) -> Pipeline {
    build_api(Preprocessor::Passthrough, logic, options)
}

/// Base64 body decoding to plain text, API shaping.
pub fn post_base64(logic: LogicFn) -> Pipeline {
    post_base64_with(logic, ApiOptions::default())
}

pub fn post_base64_with(logic: LogicFn, options: ApiOptions) -> Pipeline {
    build_api(Preprocessor::Base64Raw, logic, options)
}

/// Base64 form-url-encoded body decoding to a mapping, API shaping.
pub fn post_form_url_encoded(logic: LogicFn) -> Pipeline {
    post_form_url_encoded_with(logic, ApiOptions::default())
}

pub fn post_form_url_encoded_with(logic: LogicFn, options: ApiOptions) -> Pipeline {
    build_api(Preprocessor::Base64Form, logic, options)
}

/// Multi-method function: a verb mapping behind the API pipeline.
pub fn api_methods(map: HashMap<String, LogicFn>) -> Pipeline {
    api_methods_with(map, ApiOptions::default())
}

pub fn api_methods_with(map: HashMap<String, LogicFn>, options: ApiOptions) -> Pipeline {
    api_with(methods(map), options)
}

/// No shaping at all: the logic value and fault pass through unmodified.
pub fn raw(logic: LogicFn) -> Pipeline {
    Pipeline::new(
        Preprocessor::Passthrough,
        Responder::Passthrough,
        Recoverer::Passthrough,
        logic,
    )
}

fn build_api(preprocessor: Preprocessor, logic: LogicFn, options: ApiOptions) -> Pipeline {
    Pipeline::new(
        preprocessor,
        Responder::Api {
            headers: options.headers_for_data(),
        },
        Recoverer::Api {
            headers: options.headers_for_error(),
            pre_handler: options.error_pre_handler.clone(),
        },
        logic,
    )
}
