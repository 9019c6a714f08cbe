//! Qualified names of the Ktor and coroutines members the generated code calls.

pub const GENERATED: &str = "io.github.kingg22.ktorgen.core.Generated";

pub const REQUEST: &str = "io.ktor.client.request.request";
pub const SET_BODY: &str = "io.ktor.client.request.setBody";
pub const REQUEST_TAKE_FROM: &str = "io.ktor.client.request.takeFrom";
pub const COOKIE: &str = "io.ktor.client.request.cookie";
pub const HEADERS: &str = "io.ktor.client.request.headers";
pub const BODY: &str = "io.ktor.client.call.body";

pub const URL_TAKE_FROM: &str = "io.ktor.http.takeFrom";
pub const ENCODE_URL_PATH: &str = "io.ktor.http.encodeURLPath";
pub const DECODE_URL_QUERY_COMPONENT: &str = "io.ktor.http.decodeURLQueryComponent";
pub const CONTENT_TYPE_FN: &str = "io.ktor.http.contentType";
pub const CONTENT_TYPE: &str = "io.ktor.http.ContentType";
pub const HTTP_METHOD: &str = "io.ktor.http.HttpMethod";
pub const PARAMETERS: &str = "io.ktor.http.Parameters";

pub const FORM_DATA_CONTENT: &str = "io.ktor.client.request.forms.FormDataContent";
pub const MULTIPART_CONTENT: &str = "io.ktor.client.request.forms.MultiPartFormDataContent";
pub const FORM_DATA: &str = "io.ktor.client.request.forms.formData";

pub const ATTRIBUTE_KEY: &str = "io.ktor.util.AttributeKey";
pub const GMT_DATE: &str = "io.ktor.util.date.GMTDate";

pub const FLOW_BUILDER: &str = "kotlinx.coroutines.flow.flow";
pub const CURRENT_COROUTINE_CONTEXT: &str = "kotlinx.coroutines.currentCoroutineContext";
pub const ENSURE_ACTIVE: &str = "kotlinx.coroutines.ensureActive";

pub const OPT_IN: &str = "kotlin.OptIn";
