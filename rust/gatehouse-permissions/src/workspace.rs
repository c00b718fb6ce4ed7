use gatehouse_model::{Organization, Project};

/// The Organization and Project a resource is evaluated in.
///
/// Either may be absent (e.g. a global view evaluated without a project); an
/// absent level simply contributes no transitive roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Workspace<'a> {
    /// The enclosing organization
    pub organization: Option<&'a Organization>,
    /// The enclosing project
    pub project: Option<&'a Project>,
}

impl<'a> Workspace<'a> {
    /// A workspace made of the given levels
    pub fn new(organization: Option<&'a Organization>, project: Option<&'a Project>) -> Self {
        Self {
            organization,
            project,
        }
    }

    /// An organization without a project
    pub fn organization(organization: &'a Organization) -> Self {
        Self::new(Some(organization), None)
    }

    /// Narrow the workspace to `project`
    pub fn with_project(mut self, project: &'a Project) -> Self {
        self.project = Some(project);
        self
    }

    /// No enclosing levels at all
    pub fn none() -> Self {
        Self::default()
    }
}
