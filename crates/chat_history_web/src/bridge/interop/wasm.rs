use js_sys::{Promise, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::*;

#[wasm_bindgen(inline_js = r#"
const CHATS_STORE = 'chats';
const URL_ID_INDEX = 'urlId';

function idbSupported() {
  try {
    return typeof indexedDB !== 'undefined' && indexedDB !== null;
  } catch (_) {
    return false;
  }
}

function requestToPromise(req) {
  return new Promise((resolve, reject) => {
    req.onsuccess = () => resolve(req.result);
    req.onerror = () => reject(req.error || new Error('IndexedDB request failed'));
  });
}

function txDone(tx) {
  return new Promise((resolve, reject) => {
    tx.oncomplete = () => resolve();
    tx.onabort = () => reject(tx.error || new Error('IndexedDB transaction aborted'));
    tx.onerror = () => reject(tx.error || new Error('IndexedDB transaction error'));
  });
}

async function probeIndexedDb(name) {
  const probeName = `${name}__probe`;
  const db = await new Promise((resolve, reject) => {
    const req = indexedDB.open(probeName, 1);
    req.onsuccess = () => resolve(req.result);
    req.onerror = () => reject(req.error || new Error('IndexedDB probe open failed'));
    req.onblocked = () => reject(new Error('IndexedDB probe open blocked'));
  });
  db.close();
  await new Promise((resolve, reject) => {
    const req = indexedDB.deleteDatabase(probeName);
    req.onsuccess = () => resolve();
    req.onblocked = () => resolve();
    req.onerror = () => reject(req.error || new Error('IndexedDB probe delete failed'));
  });
}

function openRequest(name, version) {
  return new Promise((resolve, reject) => {
    const req = indexedDB.open(name, version);
    req.onupgradeneeded = () => {
      const db = req.result;
      if (!db.objectStoreNames.contains(CHATS_STORE)) {
        const store = db.createObjectStore(CHATS_STORE, { keyPath: 'id' });
        store.createIndex('id', 'id', { unique: true });
        store.createIndex(URL_ID_INDEX, URL_ID_INDEX, { unique: true });
      }
    };
    req.onsuccess = () => resolve(req.result);
    req.onerror = () => reject(req.error || new Error('Failed to open IndexedDB'));
    req.onblocked = () => reject(new Error('IndexedDB version upgrade blocked'));
  });
}

function describe(err) {
  if (err && typeof err.message === 'string') return err.message;
  return String(err);
}

async function openChatDb(name, version) {
  if (!idbSupported()) {
    return { db: null, reason: 'IndexedDB is unavailable in this browser context' };
  }
  try {
    await probeIndexedDb(name);
  } catch (err) {
    return { db: null, reason: `IndexedDB probe failed: ${describe(err)}` };
  }
  let db;
  try {
    db = await openRequest(name, version);
  } catch (err) {
    return { db: null, reason: describe(err) };
  }
  try {
    const tx = db.transaction(CHATS_STORE, 'readonly');
    await requestToPromise(tx.objectStore(CHATS_STORE).count());
    await txDone(tx);
  } catch (err) {
    db.close();
    return { db: null, reason: `IndexedDB connectivity test failed: ${describe(err)}` };
  }
  return { db, reason: null };
}

async function withChats(db, mode, fn) {
  const tx = db.transaction(CHATS_STORE, mode);
  const store = tx.objectStore(CHATS_STORE);
  const result = await fn(store);
  await txDone(tx);
  return result;
}

function scanIndexKeys(index) {
  return new Promise((resolve, reject) => {
    const keys = [];
    const req = index.openKeyCursor();
    req.onsuccess = () => {
      const cursor = req.result;
      if (cursor) {
        keys.push(String(cursor.key));
        cursor.continue();
      } else {
        resolve(keys);
      }
    };
    req.onerror = () => reject(req.error || new Error('IndexedDB cursor failed'));
  });
}

export async function jsChatDbOpen(name, version) { return await openChatDb(name, version); }
export async function jsChatGetAll(db) {
  return await withChats(db, 'readonly', (store) => requestToPromise(store.getAll()));
}
export async function jsChatGet(db, id) {
  return await withChats(db, 'readonly', (store) => requestToPromise(store.get(id)));
}
export async function jsChatGetByUrlId(db, urlId) {
  return await withChats(db, 'readonly', (store) => requestToPromise(store.index(URL_ID_INDEX).get(urlId)));
}
export async function jsChatPut(db, record) {
  await withChats(db, 'readwrite', (store) => requestToPromise(store.put(record)));
  return null;
}
export async function jsChatDelete(db, id) {
  await withChats(db, 'readwrite', (store) => requestToPromise(store.delete(id)));
  return null;
}
export async function jsChatKeys(db) {
  const keys = await withChats(db, 'readonly', (store) => requestToPromise(store.getAllKeys()));
  return keys.map(String);
}
export async function jsChatUrlIds(db) {
  return await withChats(db, 'readonly', (store) => scanIndexKeys(store.index(URL_ID_INDEX)));
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsChatDbOpen)]
    fn js_chat_db_open(name: &str, version: u32) -> Promise;
    #[wasm_bindgen(js_name = jsChatGetAll)]
    fn js_chat_get_all(db: &JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsChatGet)]
    fn js_chat_get(db: &JsValue, id: &str) -> Promise;
    #[wasm_bindgen(js_name = jsChatGetByUrlId)]
    fn js_chat_get_by_url_id(db: &JsValue, url_id: &str) -> Promise;
    #[wasm_bindgen(js_name = jsChatPut)]
    fn js_chat_put(db: &JsValue, record: JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsChatDelete)]
    fn js_chat_delete(db: &JsValue, id: &str) -> Promise;
    #[wasm_bindgen(js_name = jsChatKeys)]
    fn js_chat_keys(db: &JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsChatUrlIds)]
    fn js_chat_url_ids(db: &JsValue) -> Promise;
}

#[derive(Debug, Clone)]
/// Open `IDBDatabase` connection.
pub struct DbHandle(JsValue);

async fn await_promise(promise: Promise) -> Result<JsValue, StorageError> {
    JsFuture::from(promise)
        .await
        .map_err(|err| StorageError::Request(js_error_to_string(err)))
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn decode<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, StorageError> {
    from_value(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode_optional(value: JsValue) -> Result<Option<ChatRecord>, StorageError> {
    if value.is_null() || value.is_undefined() {
        Ok(None)
    } else {
        decode(value).map(Some)
    }
}

pub async fn open_chat_database(name: &str, version: u32) -> Result<DbHandle, String> {
    let outcome = JsFuture::from(js_chat_db_open(name, version))
        .await
        .map_err(js_error_to_string)?;
    let db = Reflect::get(&outcome, &JsValue::from_str("db")).map_err(js_error_to_string)?;
    if db.is_null() || db.is_undefined() {
        let reason = Reflect::get(&outcome, &JsValue::from_str("reason"))
            .ok()
            .and_then(|reason| reason.as_string())
            .unwrap_or_else(|| "IndexedDB open failed".to_string());
        return Err(reason);
    }
    Ok(DbHandle(db))
}

pub async fn chat_get_all(handle: &DbHandle) -> Result<Vec<ChatRecord>, StorageError> {
    decode(await_promise(js_chat_get_all(&handle.0)).await?)
}

pub async fn chat_get(handle: &DbHandle, id: &str) -> Result<Option<ChatRecord>, StorageError> {
    decode_optional(await_promise(js_chat_get(&handle.0, id)).await?)
}

pub async fn chat_get_by_url_id(
    handle: &DbHandle,
    url_id: &str,
) -> Result<Option<ChatRecord>, StorageError> {
    decode_optional(await_promise(js_chat_get_by_url_id(&handle.0, url_id)).await?)
}

pub async fn chat_put(handle: &DbHandle, record: &ChatRecord) -> Result<(), StorageError> {
    let value = record
        .serialize(&Serializer::json_compatible())
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let _ = await_promise(js_chat_put(&handle.0, value)).await?;
    Ok(())
}

pub async fn chat_delete(handle: &DbHandle, id: &str) -> Result<(), StorageError> {
    let _ = await_promise(js_chat_delete(&handle.0, id)).await?;
    Ok(())
}

pub async fn chat_keys(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    decode(await_promise(js_chat_keys(&handle.0)).await?)
}

pub async fn chat_url_ids(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    decode(await_promise(js_chat_url_ids(&handle.0)).await?)
}
