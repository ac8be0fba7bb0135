use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, warn};

use crate::blob::{decode_data_url, ensure_image, is_data_url, object_path};
use crate::model::{
    BlogPost, Collection, Entry, Project, SettingsRecord, SiteSettings, decode, draft_record,
    encode, patch_record,
};
use crate::store::{ContentError, ContentStore, Record};

/// How often the view counter on a random post is bumped.
pub const VIEW_BUMP_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Clone)]
struct ContentData {
    projects: Vec<Project>,
    posts: Vec<BlogPost>,
    settings: SiteSettings,
    settings_id: Option<String>,
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Keeps a change callback registered; dropping it unsubscribes.
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Fetched collections plus session and loading flags for one browser tab.
///
/// Single-threaded: state lives in `RefCell`s that are never borrowed across an
/// `.await`. Mutations merge into state only after the store call succeeds;
/// on failure nothing changes and the error goes back to the caller.
pub struct ContentState<S> {
    store: S,
    data: RefCell<ContentData>,
    loading: Cell<bool>,
    authenticated: Cell<bool>,
    revision: Cell<u64>,
    listeners: Rc<RefCell<Listeners>>,
}

impl<S: ContentStore> ContentState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            data: RefCell::new(ContentData::default()),
            loading: Cell::new(false),
            authenticated: Cell::new(false),
            revision: Cell::new(0),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn projects(&self) -> Vec<Project> {
        self.data.borrow().projects.clone()
    }

    pub fn project(&self, id: &str) -> Option<Project> {
        self.data.borrow().projects.iter().find(|p| p.id == id).cloned()
    }

    pub fn posts(&self) -> Vec<BlogPost> {
        self.data.borrow().posts.clone()
    }

    pub fn post(&self, id: &str) -> Option<BlogPost> {
        self.data.borrow().posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn settings(&self) -> SiteSettings {
        self.data.borrow().settings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    /// Incremented on every observable change.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, Rc::new(callback)));
        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    fn changed(&self) {
        self.revision.set(self.revision.get() + 1);
        // Callbacks may read state or drop their own subscription.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    /// Fetch all three collections. State is replaced only if every list succeeds.
    pub async fn load_all(&self) -> Result<(), ContentError> {
        self.loading.set(true);
        self.changed();
        let fetched = self.fetch_all().await;
        self.loading.set(false);
        match fetched {
            Ok(data) => {
                debug!(
                    projects = data.projects.len(),
                    posts = data.posts.len(),
                    "content loaded"
                );
                *self.data.borrow_mut() = data;
                self.changed();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "content load failed");
                self.changed();
                Err(err)
            }
        }
    }

    async fn fetch_all(&self) -> Result<ContentData, ContentError> {
        let projects = self
            .store
            .list(Collection::Projects)
            .await?
            .into_iter()
            .map(decode::<Project>)
            .collect::<Result<Vec<_>, _>>()?;
        let posts = self
            .store
            .list(Collection::BlogPosts)
            .await?
            .into_iter()
            .map(decode::<BlogPost>)
            .collect::<Result<Vec<_>, _>>()?;
        let settings_row = self
            .store
            .list(Collection::SiteSettings)
            .await?
            .into_iter()
            .next()
            .map(decode::<SettingsRecord>)
            .transpose()?;
        let (settings_id, settings) = match settings_row {
            Some(mut row) => (row.id.take(), SiteSettings::from(row)),
            None => (None, SiteSettings::default()),
        };
        Ok(ContentData {
            projects,
            posts,
            settings,
            settings_id,
        })
    }

    pub async fn add_project(&self, project: Project) -> Result<Project, ContentError> {
        self.add_entry(project, |d| &mut d.projects).await
    }

    pub async fn update_project(&self, project: Project) -> Result<Project, ContentError> {
        self.update_entry(project, |d| &mut d.projects).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ContentError> {
        self.delete_entry::<Project>(id, |d| &mut d.projects).await
    }

    pub async fn add_post(&self, post: BlogPost) -> Result<BlogPost, ContentError> {
        self.add_entry(post, |d| &mut d.posts).await
    }

    pub async fn update_post(&self, post: BlogPost) -> Result<BlogPost, ContentError> {
        self.update_entry(post, |d| &mut d.posts).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ContentError> {
        self.delete_entry::<BlogPost>(id, |d| &mut d.posts).await
    }

    async fn add_entry<T: Entry>(
        &self,
        mut entry: T,
        rows: fn(&mut ContentData) -> &mut Vec<T>,
    ) -> Result<T, ContentError> {
        self.upload_inline_images(T::COLLECTION.as_str(), entry.images_mut())
            .await?;
        let record = draft_record(&entry)?;
        let stored = self
            .store
            .insert(T::COLLECTION, record)
            .await
            .inspect_err(|e| warn!(collection = %T::COLLECTION, error = %e, "insert failed"))?;
        let stored: T = decode(stored)?;
        rows(&mut self.data.borrow_mut()).push(stored.clone());
        debug!(collection = %T::COLLECTION, id = stored.id(), "merged insert");
        self.changed();
        Ok(stored)
    }

    async fn update_entry<T: Entry>(
        &self,
        mut entry: T,
        rows: fn(&mut ContentData) -> &mut Vec<T>,
    ) -> Result<T, ContentError> {
        self.upload_inline_images(T::COLLECTION.as_str(), entry.images_mut())
            .await?;
        let patch = patch_record(&entry)?;
        let stored = self
            .store
            .update(T::COLLECTION, entry.id(), patch)
            .await
            .inspect_err(|e| {
                warn!(collection = %T::COLLECTION, id = entry.id(), error = %e, "update failed")
            })?;
        let stored: T = decode(stored)?;
        self.replace_row(rows, stored.clone());
        Ok(stored)
    }

    async fn delete_entry<T: Entry>(
        &self,
        id: &str,
        rows: fn(&mut ContentData) -> &mut Vec<T>,
    ) -> Result<(), ContentError> {
        self.store
            .delete(T::COLLECTION, id)
            .await
            .inspect_err(|e| warn!(collection = %T::COLLECTION, id, error = %e, "delete failed"))?;
        rows(&mut self.data.borrow_mut()).retain(|r| r.id() != id);
        debug!(collection = %T::COLLECTION, id, "merged delete");
        self.changed();
        Ok(())
    }

    fn replace_row<T: Entry>(&self, rows: fn(&mut ContentData) -> &mut Vec<T>, stored: T) {
        {
            let mut data = self.data.borrow_mut();
            if let Some(slot) = rows(&mut data).iter_mut().find(|r| r.id() == stored.id()) {
                *slot = stored.clone();
            }
        }
        debug!(collection = %T::COLLECTION, id = stored.id(), "merged update");
        self.changed();
    }

    /// Save the settings row, inserting it the first time.
    pub async fn save_settings(&self, mut settings: SiteSettings) -> Result<SiteSettings, ContentError> {
        self.upload_inline_images(Collection::SiteSettings.as_str(), settings.images_mut())
            .await?;
        let record = encode(&SettingsRecord::from_settings(None, &settings))?;
        let existing_id = self.data.borrow().settings_id.clone();
        let stored = match existing_id {
            Some(id) => self.store.update(Collection::SiteSettings, &id, record).await,
            None => self.store.insert(Collection::SiteSettings, record).await,
        }
        .inspect_err(|e| warn!(error = %e, "settings save failed"))?;
        let mut stored: SettingsRecord = decode(stored)?;
        let settings_id = stored.id.take();
        let settings = SiteSettings::from(stored);
        {
            let mut data = self.data.borrow_mut();
            if settings_id.is_some() {
                data.settings_id = settings_id;
            }
            data.settings = settings.clone();
        }
        debug!("merged settings");
        self.changed();
        Ok(settings)
    }

    /// Upload raw image bytes under a content-addressed path and return the public URL.
    pub async fn upload_image(
        &self,
        prefix: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, ContentError> {
        ensure_image(mime)?;
        let path = object_path(prefix, &bytes, mime);
        self.store
            .upload_blob(&path, bytes, mime)
            .await
            .inspect_err(|e| warn!(path, error = %e, "upload failed"))
    }

    /// Replace any legacy `data:` image with an uploaded URL.
    async fn upload_inline_images(
        &self,
        prefix: &str,
        fields: Vec<&mut String>,
    ) -> Result<(), ContentError> {
        for field in fields {
            if !is_data_url(field) {
                continue;
            }
            let (mime, bytes) = decode_data_url(field)?;
            *field = self.upload_image(prefix, bytes, &mime).await?;
        }
        Ok(())
    }

    pub async fn login(&self, password: &str) -> Result<bool, ContentError> {
        let ok = self.store.sign_in(password).await?;
        if ok {
            self.authenticated.set(true);
            self.changed();
        }
        Ok(ok)
    }

    pub async fn logout(&self) {
        if let Err(err) = self.store.sign_out().await {
            warn!(error = %err, "sign out failed");
        }
        self.authenticated.set(false);
        self.changed();
    }

    /// Add one view to a uniformly chosen post. Returns the post id and new count.
    pub async fn bump_random_post_views<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<(String, u64)>, ContentError> {
        let target = {
            let data = self.data.borrow();
            data.posts.choose(rng).map(|p| (p.id.clone(), p.views))
        };
        let Some((id, views)) = target else {
            return Ok(None);
        };
        let mut patch = Record::new();
        patch.insert("views".to_string(), Value::from(views + 1));
        let stored = self
            .store
            .update(Collection::BlogPosts, &id, patch)
            .await
            .inspect_err(|e| warn!(id, error = %e, "view bump failed"))?;
        let stored: BlogPost = decode(stored)?;
        let views = stored.views;
        self.replace_row(|d| &mut d.posts, stored);
        Ok(Some((id, views)))
    }
}
