//! Route declaration and reverse-routing table.
//!
//! # Responsibilities
//! - Expose the declaration DSL (`match_route`, verb shorthands, `root`,
//!   `resource`, `resources`, `namespace`)
//! - Expand each declaration into concrete `(verb, pattern, handler)` routes
//! - Hand concrete routes to the definer, in declaration order
//! - Record one reverse entry per `controller#action` (first declaration wins)
//! - Announce named helpers to the assistant
//!
//! # Design Decisions
//! - Declaration callbacks receive the router explicitly (`&mut Router`)
//! - Namespace scopes are strictly nested: pushed before a block runs and
//!   popped after it returns, even when it returns an error
//! - Collaborators are borrowed trait objects so closures and tables can both
//!   act as handler factory, definer or assistant
//! - Whether nested resources namespace their controllers is a setting,
//!   defaulting to off for both `resource` and `resources`

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::entry::routing_key;
use crate::routing::inflect::{functionize, singularize, underscore};
use crate::routing::{
    NamespaceStack, PatternOptions, ReverseRoutes, RouteEntry, RoutePattern, RoutingError, Verb,
};

/// Builds the handler bound to a controller action.
pub trait HandlerFactory<H> {
    fn handler(&self, controller: &str, action: &str) -> H;
}

impl<H, F> HandlerFactory<H> for F
where
    F: Fn(&str, &str) -> H,
{
    fn handler(&self, controller: &str, action: &str) -> H {
        self(controller, action)
    }
}

/// Registers a concrete route with the server that dispatches requests.
pub trait Definer<H> {
    fn define(&mut self, verb: Verb, pattern: &RoutePattern, handlers: Vec<H>);
}

impl<H, F> Definer<H> for F
where
    F: FnMut(Verb, &RoutePattern, Vec<H>),
{
    fn define(&mut self, verb: Verb, pattern: &RoutePattern, handlers: Vec<H>) {
        self(verb, pattern, handlers)
    }
}

/// What a named helper resolves to.
#[derive(Debug, Clone)]
pub enum HelperTarget {
    /// A controller action's reverse entry.
    Entry(Arc<RouteEntry>),
    /// A literal path, for routes mounted with inline handlers.
    Path(String),
}

/// Installs named reverse-routing helpers.
pub trait Assistant {
    fn assist(&mut self, name: &str, target: HelperTarget);
}

impl<F> Assistant for F
where
    F: FnMut(&str, HelperTarget),
{
    fn assist(&mut self, name: &str, target: HelperTarget) {
        self(name, target)
    }
}

/// Where a matched route sends the request.
#[derive(Debug, Clone)]
pub enum Target<H> {
    /// Dispatch to a controller action.
    Action { controller: String, action: String },
    /// Mount handlers directly, bypassing controller resolution.
    Inline(Vec<H>),
}

impl<H> Target<H> {
    pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Target::Action {
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn inline(handlers: impl IntoIterator<Item = H>) -> Self {
        Target::Inline(handlers.into_iter().collect())
    }
}

/// `"controller#action"` shorthand.
impl<H> From<&str> for Target<H> {
    fn from(shorthand: &str) -> Self {
        match shorthand.split_once('#') {
            Some((controller, action)) => Target::action(controller, action),
            None => Target::action(shorthand, ""),
        }
    }
}

/// Options for `match_route` and the verb shorthands.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Allowed verbs; `get` when empty.
    pub via: Vec<String>,
    /// Name for the routing helper.
    pub helper: Option<String>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn via(mut self, verb: impl Into<String>) -> Self {
        self.via.push(verb.into());
        self
    }

    pub fn helper(mut self, name: impl Into<String>) -> Self {
        self.helper = Some(name.into());
        self
    }

    fn verbs(&self) -> Result<Vec<Verb>, RoutingError> {
        if self.via.is_empty() {
            return Ok(vec![Verb::Get]);
        }
        self.via.iter().map(|v| v.parse()).collect()
    }
}

/// Conventional resource actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    Index,
    New,
    Create,
    Show,
    Edit,
    Update,
    Destroy,
}

impl ResourceAction {
    const SINGULAR: [ResourceAction; 6] = [
        ResourceAction::New,
        ResourceAction::Create,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];

    const COLLECTION: [ResourceAction; 7] = [
        ResourceAction::Index,
        ResourceAction::New,
        ResourceAction::Create,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Index => "index",
            ResourceAction::New => "new",
            ResourceAction::Create => "create",
            ResourceAction::Show => "show",
            ResourceAction::Edit => "edit",
            ResourceAction::Update => "update",
            ResourceAction::Destroy => "destroy",
        }
    }
}

/// Options for `resource` and `resources`.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Draw only these actions.
    pub only: Option<Vec<ResourceAction>>,
    /// Skip these actions. Ignored when `only` is set.
    pub except: Vec<ResourceAction>,
    /// Member placeholder name, `id` when unset. Also names the nested scope
    /// placeholder.
    pub param: Option<String>,
    /// Prefix nested controllers with the resource name. Falls back to
    /// `RouterSettings::nest_resource_controllers`.
    pub namespace: Option<bool>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        self.only = Some(actions.into_iter().collect());
        self
    }

    pub fn except(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        self.except = actions.into_iter().collect();
        self
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.param = Some(name.into());
        self
    }

    pub fn namespace(mut self, nest: bool) -> Self {
        self.namespace = Some(nest);
        self
    }

    fn actions(&self, defaults: &[ResourceAction]) -> Vec<ResourceAction> {
        match &self.only {
            Some(only) => only.clone(),
            None => defaults
                .iter()
                .copied()
                .filter(|a| !self.except.contains(a))
                .collect(),
        }
    }
}

/// Options for `namespace`.
#[derive(Debug, Clone, Default)]
pub struct NamespaceOptions {
    /// Controller qualifier, the namespace name when unset.
    pub module: Option<String>,
    /// Helper qualifier, the namespace name when unset.
    pub method: Option<String>,
}

/// Router-wide settings.
#[derive(Debug, Clone, Copy)]
pub struct RouterSettings {
    pub pattern: PatternOptions,
    pub separator: char,
    pub nest_resource_controllers: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            pattern: PatternOptions::default(),
            separator: '/',
            nest_resource_controllers: false,
        }
    }
}

/// Route declaration DSL and reverse-routing table.
pub struct Router<'a, H> {
    handler: &'a dyn HandlerFactory<H>,
    definer: Option<&'a mut dyn Definer<H>>,
    assistant: Option<&'a mut dyn Assistant>,
    settings: RouterSettings,
    namespaces: NamespaceStack,
    entries: HashMap<String, Arc<RouteEntry>>,
    defined: usize,
}

impl<'a, H: Clone> Router<'a, H> {
    /// Create a router that builds handlers with `handler`.
    pub fn new(handler: &'a dyn HandlerFactory<H>) -> Self {
        let settings = RouterSettings::default();
        Self {
            handler,
            definer: None,
            assistant: None,
            settings,
            namespaces: NamespaceStack::new(settings.separator),
            entries: HashMap::new(),
            defined: 0,
        }
    }

    /// Register the definer. Required before any route is declared.
    pub fn definer(mut self, definer: &'a mut dyn Definer<H>) -> Self {
        self.definer = Some(definer);
        self
    }

    /// Register the assistant. Without one, helper announcements are dropped.
    pub fn assistant(mut self, assistant: &'a mut dyn Assistant) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Replace the settings. Resets the namespace stack to a fresh root.
    pub fn settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self.namespaces = NamespaceStack::new(settings.separator);
        self
    }

    /// Run a route-drawing function against this router.
    pub fn draw<F>(&mut self, f: F) -> Result<(), RoutingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RoutingError>,
    {
        f(self)?;
        tracing::info!(
            routes = self.defined,
            entries = self.entries.len(),
            "Routes drawn"
        );
        Ok(())
    }

    /// Route `pattern` to `target` for the verbs in `options.via`.
    pub fn match_route(
        &mut self,
        pattern: &str,
        target: impl Into<Target<H>>,
        options: MatchOptions,
    ) -> Result<(), RoutingError> {
        let verbs = options.verbs()?;
        let path = self.namespaces.qualify_path(pattern);
        let helper = options.helper.as_deref().and_then(|h| functionize(&[h]));

        match target.into() {
            Target::Inline(handlers) => {
                let compiled = self.compile(&path)?;
                for verb in verbs {
                    self.define(verb, &compiled, handlers.clone())?;
                }
                if let Some(helper) = helper {
                    self.assist(&helper, HelperTarget::Path(path));
                }
            }
            Target::Action { controller, action } => {
                if controller.is_empty() || action.is_empty() {
                    return Err(RoutingError::InvalidTarget {
                        target: format!("{controller}#{action}"),
                    });
                }
                let controller = self.namespaces.qualify_controller(&controller);
                let normalised = functionize(&[action.as_str()]);
                let action = normalised.unwrap_or(action);
                for verb in verbs {
                    self.add_route(verb, &path, &controller, &action, helper.as_deref())?;
                }
            }
        }
        Ok(())
    }

    /// Route `pattern` for a single verb.
    pub fn route(
        &mut self,
        verb: Verb,
        pattern: &str,
        target: impl Into<Target<H>>,
        mut options: MatchOptions,
    ) -> Result<(), RoutingError> {
        options.via = vec![verb.as_str().to_string()];
        self.match_route(pattern, target, options)
    }

    pub fn get(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Get, pattern, target, options)
    }

    pub fn post(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Post, pattern, target, options)
    }

    pub fn put(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Put, pattern, target, options)
    }

    pub fn patch(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Patch, pattern, target, options)
    }

    pub fn delete(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Delete, pattern, target, options)
    }

    pub fn head(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Head, pattern, target, options)
    }

    pub fn options(&mut self, pattern: &str, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.route(Verb::Options, pattern, target, options)
    }

    /// Route the root path. Declare it first; it is usually the busiest route.
    pub fn root(&mut self, target: impl Into<Target<H>>, options: MatchOptions) -> Result<(), RoutingError> {
        self.match_route("", target, options)
    }

    /// Singleton resource routes for `name`.
    ///
    /// ```text
    /// GET     /profile/new   -> new      newProfile
    /// POST    /profile       -> create
    /// GET     /profile       -> show     profile
    /// GET     /profile/edit  -> edit     editProfile
    /// PUT     /profile       -> update
    /// DELETE  /profile       -> destroy
    /// ```
    pub fn resource(&mut self, name: &str, options: ResourceOptions) -> Result<(), RoutingError> {
        self.resource_nested(name, options, |_| Ok(()))
    }

    /// Singleton resource with nested declarations scoped under `/name`.
    pub fn resource_nested<F>(&mut self, name: &str, options: ResourceOptions, f: F) -> Result<(), RoutingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RoutingError>,
    {
        let path = self.namespaces.qualify_path(name);
        let controller = self.namespaces.qualify_controller(name);
        let helper = self.namespaces.qualify_helper(name);

        for action in options.actions(&ResourceAction::SINGULAR) {
            let (verb, pattern, helper) = match action {
                ResourceAction::New => (Verb::Get, format!("{path}/new.:format?"), prefixed("new", &helper)),
                ResourceAction::Create => (Verb::Post, path.clone(), None),
                ResourceAction::Show => (Verb::Get, format!("{path}.:format?"), helper.clone()),
                ResourceAction::Edit => (Verb::Get, format!("{path}/edit.:format?"), prefixed("edit", &helper)),
                ResourceAction::Update => (Verb::Put, path.clone(), None),
                ResourceAction::Destroy => (Verb::Delete, path.clone(), None),
                ResourceAction::Index => continue,
            };
            self.add_route(verb, &pattern, &controller, action.as_str(), helper.as_deref())?;
        }

        let module = self.nested_module(&options, name);
        self.scoped(name, module, Some(name), f)
    }

    /// Collection resource routes for `name`.
    ///
    /// ```text
    /// GET     /photos           -> index    photos
    /// GET     /photos/new       -> new      newPhoto
    /// POST    /photos           -> create
    /// GET     /photos/:id       -> show     photo
    /// GET     /photos/:id/edit  -> edit     editPhoto
    /// PUT     /photos/:id       -> update
    /// DELETE  /photos/:id       -> destroy
    /// ```
    pub fn resources(&mut self, name: &str, options: ResourceOptions) -> Result<(), RoutingError> {
        self.resources_nested(name, options, |_| Ok(()))
    }

    /// Collection resource with nested declarations scoped under
    /// `/name/:singular_id`.
    pub fn resources_nested<F>(&mut self, name: &str, options: ResourceOptions, f: F) -> Result<(), RoutingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RoutingError>,
    {
        let singular = singularize(name);
        let path = self.namespaces.qualify_path(name);
        let param = format!(":{}", options.param.as_deref().unwrap_or("id"));
        let controller = self.namespaces.qualify_controller(name);
        let helper = self.namespaces.qualify_helper(&singular);
        let collection_helper = self.namespaces.qualify_helper(name);

        for action in options.actions(&ResourceAction::COLLECTION) {
            let (verb, pattern, helper) = match action {
                ResourceAction::Index => (Verb::Get, format!("{path}.:format?"), collection_helper.clone()),
                ResourceAction::New => (Verb::Get, format!("{path}/new.:format?"), prefixed("new", &helper)),
                ResourceAction::Create => (Verb::Post, path.clone(), None),
                ResourceAction::Show => (Verb::Get, format!("{path}/{param}.:format?"), helper.clone()),
                ResourceAction::Edit => (Verb::Get, format!("{path}/{param}/edit.:format?"), prefixed("edit", &helper)),
                ResourceAction::Update => (Verb::Put, format!("{path}/{param}"), None),
                ResourceAction::Destroy => (Verb::Delete, format!("{path}/{param}"), None),
            };
            self.add_route(verb, &pattern, &controller, action.as_str(), helper.as_deref())?;
        }

        let placeholder = match &options.param {
            Some(param) => format!(":{param}"),
            None => format!(":{}_id", underscore(&singular)),
        };
        let module = self.nested_module(&options, name);
        self.scoped(&format!("{name}/{placeholder}"), module, Some(singular.as_str()), f)
    }

    /// Group declarations under `name`, prefixing paths, controllers and
    /// helpers.
    pub fn namespace<F>(&mut self, name: &str, options: NamespaceOptions, f: F) -> Result<(), RoutingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RoutingError>,
    {
        let module = options.module.as_deref().unwrap_or(name);
        let method = options.method.as_deref().unwrap_or(name);
        self.scoped(name, Some(module), Some(method), f)
    }

    /// Reverse entry for `controller#action`.
    pub fn find(&self, controller: &str, action: &str) -> Option<&RouteEntry> {
        self.entries
            .get(&routing_key(controller, action))
            .map(Arc::as_ref)
    }

    /// Number of concrete routes handed to the definer so far.
    pub fn route_count(&self) -> usize {
        self.defined
    }

    /// Freeze the reverse table for use at request time.
    pub fn into_reverse_routes(self) -> ReverseRoutes {
        ReverseRoutes::new(self.entries)
    }

    fn scoped<F>(&mut self, name: &str, module: Option<&str>, method: Option<&str>, f: F) -> Result<(), RoutingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RoutingError>,
    {
        self.namespaces.push(name, module, method);
        let result = f(self);
        self.namespaces.pop();
        result
    }

    fn nested_module<'n>(&self, options: &ResourceOptions, name: &'n str) -> Option<&'n str> {
        options
            .namespace
            .unwrap_or(self.settings.nest_resource_controllers)
            .then_some(name)
    }

    fn compile(&self, pattern: &str) -> Result<RoutePattern, RoutingError> {
        RoutePattern::compile(pattern, self.settings.pattern)
    }

    fn define(&mut self, verb: Verb, pattern: &RoutePattern, handlers: Vec<H>) -> Result<(), RoutingError> {
        let definer = self.definer.as_mut().ok_or(RoutingError::RouterNotConfigured)?;
        definer.define(verb, pattern, handlers);
        self.defined += 1;
        tracing::debug!(verb = %verb, pattern = %pattern, "Route defined");
        Ok(())
    }

    fn assist(&mut self, name: &str, target: HelperTarget) {
        if let Some(assistant) = self.assistant.as_mut() {
            assistant.assist(name, target);
        }
    }

    /// Register one concrete route and, if it is the first for its
    /// controller action, its reverse entry and helper.
    fn add_route(
        &mut self,
        verb: Verb,
        pattern: &str,
        controller: &str,
        action: &str,
        helper: Option<&str>,
    ) -> Result<(), RoutingError> {
        if self.definer.is_none() {
            return Err(RoutingError::RouterNotConfigured);
        }
        let compiled = self.compile(pattern)?;
        let handler = self.handler.handler(controller, action);
        self.define(verb, &compiled, vec![handler])?;

        let key = routing_key(controller, action);
        if self.entries.contains_key(&key) {
            tracing::trace!(key = %key, pattern = %pattern, "Reverse entry already present, keeping first");
            return Ok(());
        }

        let entry = Arc::new(RouteEntry::new(controller, action, compiled));
        self.entries.insert(key, Arc::clone(&entry));
        if let Some(helper) = helper {
            self.assist(helper, HelperTarget::Entry(entry));
        }
        Ok(())
    }
}

fn prefixed(prefix: &str, helper: &Option<String>) -> Option<String> {
    helper.as_deref().and_then(|h| functionize(&[prefix, h]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Params;

    #[derive(Default)]
    struct Recorder {
        routes: Vec<(Verb, String, Vec<String>)>,
    }

    impl Definer<String> for Recorder {
        fn define(&mut self, verb: Verb, pattern: &RoutePattern, handlers: Vec<String>) {
            self.routes.push((verb, pattern.as_str().to_string(), handlers));
        }
    }

    #[derive(Default)]
    struct Helpers {
        names: Vec<(String, String)>,
    }

    impl Assistant for Helpers {
        fn assist(&mut self, name: &str, target: HelperTarget) {
            let target = match target {
                HelperTarget::Entry(entry) => entry.pattern().as_str().to_string(),
                HelperTarget::Path(path) => path,
            };
            self.names.push((name.to_string(), target));
        }
    }

    fn factory(controller: &str, action: &str) -> String {
        format!("{controller}#{action}")
    }

    fn draw<F>(settings: RouterSettings, f: F) -> (Recorder, Helpers, ReverseRoutes)
    where
        F: FnOnce(&mut Router<'_, String>) -> Result<(), RoutingError>,
    {
        let mut recorder = Recorder::default();
        let mut helpers = Helpers::default();
        let reverse = {
            let mut router = Router::<String>::new(&factory)
                .settings(settings)
                .definer(&mut recorder)
                .assistant(&mut helpers);
            router.draw(f).unwrap();
            router.into_reverse_routes()
        };
        (recorder, helpers, reverse)
    }

    fn path(reverse: &ReverseRoutes, controller: &str, action: &str, params: &Params) -> String {
        reverse
            .path_for(controller, action, params)
            .expect("entry present")
            .expect("path builds")
    }

    #[test]
    fn test_match_shorthand_round_trip() {
        let (recorder, _, reverse) = draw(RouterSettings::default(), |r| {
            r.match_route("bands/:id", "bands#show", MatchOptions::new())
        });
        assert_eq!(
            recorder.routes,
            vec![(Verb::Get, "/bands/:id".to_string(), vec!["bands#show".to_string()])]
        );
        assert_eq!(path(&reverse, "bands", "show", &Params::new().with("id", 101)), "/bands/101");
    }

    #[test]
    fn test_match_missing_required_parameter() {
        let (_, _, reverse) = draw(RouterSettings::default(), |r| {
            r.match_route("songs/:title", "songs#show", MatchOptions::new())
        });
        let err = reverse.path_for("songs", "show", &Params::new()).unwrap().unwrap_err();
        assert!(matches!(
            err,
            RoutingError::MissingParameter { ref name, ref pattern }
                if name == "title" && pattern == "/songs/:title"
        ));
    }

    #[test]
    fn test_optional_placeholder_omitted() {
        let (_, _, reverse) = draw(RouterSettings::default(), |r| {
            r.match_route("profile/:format?", "profiles#show", MatchOptions::new())
        });
        assert_eq!(path(&reverse, "profiles", "show", &Params::new()), "/profile");
    }

    #[test]
    fn test_first_registration_wins() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.match_route("/a", "x#show", MatchOptions::new().helper("first"))?;
            r.match_route("/b", "x#show", MatchOptions::new().helper("second"))
        });
        // Both stay live for dispatch.
        assert_eq!(recorder.routes.len(), 2);
        assert_eq!(reverse.find("x", "show").unwrap().pattern().as_str(), "/a");
        // Only the first announces its helper.
        assert_eq!(helpers.names, vec![("first".to_string(), "/a".to_string())]);
    }

    #[test]
    fn test_via_multiple_verbs() {
        let (recorder, _, _) = draw(RouterSettings::default(), |r| {
            r.match_route("/auth/login", "auth#login", MatchOptions::new().via("post").via("PUT"))
        });
        let verbs: Vec<Verb> = recorder.routes.iter().map(|(v, _, _)| *v).collect();
        assert_eq!(verbs, vec![Verb::Post, Verb::Put]);
    }

    #[test]
    fn test_unsupported_method() {
        let mut recorder = Recorder::default();
        let mut router = Router::<String>::new(&factory).definer(&mut recorder);
        let err = router
            .match_route("/x", "x#y", MatchOptions::new().via("fetch"))
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnsupportedMethod { ref method } if method == "fetch"));
        assert_eq!(router.route_count(), 0);
    }

    #[test]
    fn test_router_not_configured() {
        let mut router = Router::<String>::new(&factory);
        let err = router.get("/x", "x#y", MatchOptions::new()).unwrap_err();
        assert!(matches!(err, RoutingError::RouterNotConfigured));
    }

    #[test]
    fn test_assistant_optional() {
        let mut recorder = Recorder::default();
        let mut router = Router::<String>::new(&factory).definer(&mut recorder);
        router
            .get("/bands", "bands#index", MatchOptions::new().helper("bands"))
            .unwrap();
        assert!(router.find("bands", "index").is_some());
    }

    #[test]
    fn test_invalid_shorthand() {
        let mut recorder = Recorder::default();
        let mut router = Router::<String>::new(&factory).definer(&mut recorder);
        let err = router.get("/x", "pages", MatchOptions::new()).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidTarget { .. }));
    }

    #[test]
    fn test_verb_shorthand_and_root() {
        let (recorder, _, reverse) = draw(RouterSettings::default(), |r| {
            r.root("pages#main", MatchOptions::new())?;
            r.post("bands", "bands#create", MatchOptions::new())?;
            r.delete("bands/:id", "bands#destroy", MatchOptions::new())
        });
        assert_eq!(recorder.routes[0].0, Verb::Get);
        assert_eq!(recorder.routes[0].1, "/");
        assert_eq!(recorder.routes[1].0, Verb::Post);
        assert_eq!(recorder.routes[2].0, Verb::Delete);
        assert_eq!(path(&reverse, "pages", "main", &Params::new()), "/");
    }

    #[test]
    fn test_action_and_controller_normalised() {
        let (recorder, _, reverse) = draw(RouterSettings::default(), |r| {
            r.get("/users/signup", "UsersController#sign_up", MatchOptions::new())
        });
        assert_eq!(recorder.routes[0].2, vec!["users#signUp".to_string()]);
        assert!(reverse.find("users", "signUp").is_some());
    }

    #[test]
    fn test_inline_handlers() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.match_route(
                "/health",
                Target::inline(["load".to_string(), "respond".to_string()]),
                MatchOptions::new().helper("health"),
            )
        });
        assert_eq!(
            recorder.routes,
            vec![(
                Verb::Get,
                "/health".to_string(),
                vec!["load".to_string(), "respond".to_string()]
            )]
        );
        assert_eq!(helpers.names, vec![("health".to_string(), "/health".to_string())]);
        assert!(reverse.is_empty());
    }

    #[test]
    fn test_resources_expansion() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.resources("photos", ResourceOptions::new())
        });
        let expected = [
            (Verb::Get, "/photos.:format?", "photos#index"),
            (Verb::Get, "/photos/new.:format?", "photos#new"),
            (Verb::Post, "/photos", "photos#create"),
            (Verb::Get, "/photos/:id.:format?", "photos#show"),
            (Verb::Get, "/photos/:id/edit.:format?", "photos#edit"),
            (Verb::Put, "/photos/:id", "photos#update"),
            (Verb::Delete, "/photos/:id", "photos#destroy"),
        ];
        assert_eq!(recorder.routes.len(), 7);
        for ((verb, pattern, handlers), (ev, ep, eh)) in recorder.routes.iter().zip(expected) {
            assert_eq!(*verb, ev);
            assert_eq!(pattern, ep);
            assert_eq!(handlers, &vec![eh.to_string()]);
        }

        let id = Params::new().with("id", "abc123");
        assert_eq!(path(&reverse, "photos", "index", &Params::new()), "/photos");
        assert_eq!(path(&reverse, "photos", "new", &Params::new()), "/photos/new");
        assert_eq!(path(&reverse, "photos", "create", &Params::new()), "/photos");
        assert_eq!(path(&reverse, "photos", "show", &id), "/photos/abc123");
        assert_eq!(path(&reverse, "photos", "edit", &id), "/photos/abc123/edit");
        assert_eq!(path(&reverse, "photos", "update", &id), "/photos/abc123");
        assert_eq!(path(&reverse, "photos", "destroy", &id), "/photos/abc123");

        let names: Vec<&str> = helpers.names.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["photos", "newPhoto", "photo", "editPhoto"]);
    }

    #[test]
    fn test_resource_singleton_expansion() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.resource("profile", ResourceOptions::new())
        });
        assert_eq!(recorder.routes.len(), 6);
        assert!(recorder.routes.iter().all(|(_, _, h)| h[0].starts_with("profile#")));
        assert_eq!(path(&reverse, "profile", "show", &Params::new()), "/profile");
        assert_eq!(path(&reverse, "profile", "edit", &Params::new()), "/profile/edit");

        let names: Vec<&str> = helpers.names.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["newProfile", "profile", "editProfile"]);
    }

    #[test]
    fn test_resource_filters() {
        let (only, _, _) = draw(RouterSettings::default(), |r| {
            r.resources("photos", ResourceOptions::new().only([ResourceAction::Index, ResourceAction::Show]))
        });
        assert_eq!(only.routes.len(), 2);

        let (except, _, reverse) = draw(RouterSettings::default(), |r| {
            r.resources("photos", ResourceOptions::new().except([ResourceAction::Destroy]))
        });
        assert_eq!(except.routes.len(), 6);
        assert!(reverse.find("photos", "destroy").is_none());

        // `index` has no meaning for a singleton.
        let (singleton, _, _) = draw(RouterSettings::default(), |r| {
            r.resource("profile", ResourceOptions::new().only([ResourceAction::Index, ResourceAction::Show]))
        });
        assert_eq!(singleton.routes.len(), 1);
    }

    #[test]
    fn test_namespace_qualification() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.namespace("admin", NamespaceOptions::default(), |r| {
                r.resources("posts", ResourceOptions::new())
            })
        });
        assert!(recorder.routes.iter().all(|(_, p, h)| {
            p.starts_with("/admin/posts") && h[0].starts_with("admin/posts#")
        }));
        assert_eq!(path(&reverse, "admin/posts", "index", &Params::new()), "/admin/posts");
        assert!(helpers.names.iter().any(|(n, _)| n == "adminPosts"));
        assert!(helpers.names.iter().any(|(n, _)| n == "editAdminPost"));
    }

    #[test]
    fn test_namespace_popped_after_block() {
        let (recorder, _, _) = draw(RouterSettings::default(), |r| {
            r.namespace("admin", NamespaceOptions::default(), |r| {
                r.get("stats", "stats#show", MatchOptions::new())
            })?;
            r.get("stats", "stats#public", MatchOptions::new())
        });
        assert_eq!(recorder.routes[0].1, "/admin/stats");
        assert_eq!(recorder.routes[1].1, "/stats");
    }

    #[test]
    fn test_namespace_popped_after_error() {
        let mut recorder = Recorder::default();
        let mut router = Router::<String>::new(&factory).definer(&mut recorder);
        let err = router
            .namespace("admin", NamespaceOptions::default(), |r| {
                r.match_route("x", "x#y", MatchOptions::new().via("bogus"))
            })
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnsupportedMethod { .. }));

        router.get("after", "after#show", MatchOptions::new()).unwrap();
        assert_eq!(router.find("after", "show").unwrap().pattern().as_str(), "/after");
    }

    #[test]
    fn test_namespace_module_override() {
        let (recorder, _, _) = draw(RouterSettings::default(), |r| {
            r.namespace(
                "api/v1",
                NamespaceOptions { module: Some("api".into()), method: None },
                |r| r.get("status", "status#show", MatchOptions::new()),
            )
        });
        assert_eq!(recorder.routes[0].1, "/api/v1/status");
        assert_eq!(recorder.routes[0].2, vec!["api/status#show".to_string()]);
    }

    #[test]
    fn test_nested_resources_default() {
        let (recorder, helpers, reverse) = draw(RouterSettings::default(), |r| {
            r.resources_nested("bands", ResourceOptions::new(), |r| {
                r.resources("albums", ResourceOptions::new())
            })
        });
        assert_eq!(recorder.routes.len(), 14);

        let albums = reverse.find("albums", "index").unwrap();
        assert_eq!(albums.pattern().as_str(), "/bands/:band_id/albums.:format?");
        assert_eq!(path(&reverse, "albums", "index", &Params::new().with("band_id", 5)), "/bands/5/albums");
        assert_eq!(
            path(&reverse, "albums", "show", &Params::new().with("band_id", 5).with("id", 9)),
            "/bands/5/albums/9"
        );
        assert!(matches!(
            reverse.path_for("albums", "index", &Params::new()).unwrap(),
            Err(RoutingError::MissingParameter { .. })
        ));

        let names: Vec<&str> = helpers.names.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"bandAlbums"));
        assert!(names.contains(&"bandAlbum"));
        assert!(names.contains(&"newBandAlbum"));
        assert!(names.contains(&"editBandAlbum"));
    }

    #[test]
    fn test_nested_resources_namespaced_controller() {
        let (_, _, reverse) = draw(RouterSettings::default(), |r| {
            r.resources_nested("bands", ResourceOptions::new().namespace(true), |r| {
                r.resources("albums", ResourceOptions::new())
            })
        });
        assert!(reverse.find("albums", "index").is_none());
        let entry = reverse.find("bands/albums", "index").unwrap();
        assert_eq!(entry.pattern().as_str(), "/bands/:band_id/albums.:format?");

        let settings = RouterSettings {
            nest_resource_controllers: true,
            ..RouterSettings::default()
        };
        let (_, _, reverse) = draw(settings, |r| {
            r.resource_nested("account", ResourceOptions::new(), |r| {
                r.resources("keys", ResourceOptions::new())
            })
        });
        assert_eq!(
            reverse.find("account/keys", "index").unwrap().pattern().as_str(),
            "/account/keys.:format?"
        );
    }

    #[test]
    fn test_custom_param() {
        let (_, _, reverse) = draw(RouterSettings::default(), |r| {
            r.resources_nested("users", ResourceOptions::new().param("username"), |r| {
                r.resources("posts", ResourceOptions::new().only([ResourceAction::Index]))
            })
        });
        assert_eq!(
            reverse.find("users", "show").unwrap().pattern().as_str(),
            "/users/:username.:format?"
        );
        assert_eq!(
            reverse.find("posts", "index").unwrap().pattern().as_str(),
            "/users/:username/posts.:format?"
        );
    }
}
